use crate::domain::models::guest::Guest;
use std::borrow::Cow;

pub const CSV_HEADER: &str = "Name,Email,Status,Response Date,Message,Created At";

pub fn guests_to_csv(guests: &[Guest]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for guest in guests {
        let responded = guest.responded_at.map(|t| t.to_rfc3339()).unwrap_or_default();
        let fields = [
            csv_field(&guest.name),
            csv_field(&guest.email),
            Cow::Borrowed(guest.status.as_str()),
            Cow::Owned(responded),
            csv_field(guest.message.as_deref().unwrap_or_default()),
            Cow::Owned(guest.created_at.to_rfc3339()),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Quotes a field containing a comma, quote or line break, doubling inner quotes.
pub fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::guest::{GuestDraft, GuestStatus};

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("Doe, Jane"), "\"Doe, Jane\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_export_rows() {
        let guest = Guest::new("ev".into(), GuestDraft {
            name: "Doe, Jane".into(),
            email: "jane@x.com".into(),
            status: GuestStatus::Confirmed,
            message: Some("Can't wait".into()),
        });
        let csv = guests_to_csv(&[guest]);
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some(CSV_HEADER));
        let row = lines.next().unwrap();
        assert!(row.starts_with("\"Doe, Jane\",jane@x.com,confirmed,"));
        assert!(row.contains(",Can't wait,"));
        assert_eq!(lines.next(), None);
    }
}
