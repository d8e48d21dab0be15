use crate::domain::models::{
    communication::CommunicationRecord,
    guest::{Guest, GuestStatus},
};
use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct EventStats {
    pub event_id: String,
    pub total_guests: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub declined: usize,
    /// Share of guests that answered, in whole percent.
    pub response_rate: u32,
    pub capacity_remaining: Option<i64>,
    pub communications_sent: usize,
    pub emails_attempted: i64,
    pub emails_delivered: i64,
}

pub fn summarize(event_id: &str, capacity: Option<i32>, guests: &[Guest], records: &[CommunicationRecord]) -> EventStats {
    let count = |status: GuestStatus| guests.iter().filter(|g| g.status == status).count();
    let confirmed = count(GuestStatus::Confirmed);
    let declined = count(GuestStatus::Declined);
    let total = guests.len();

    let response_rate = if total == 0 {
        0
    } else {
        ((confirmed + declined) as f64 / total as f64 * 100.0).round() as u32
    };

    EventStats {
        event_id: event_id.to_string(),
        total_guests: total,
        pending: count(GuestStatus::Pending),
        confirmed,
        declined,
        response_rate,
        capacity_remaining: capacity.map(|c| i64::from(c) - confirmed as i64),
        communications_sent: records.len(),
        emails_attempted: records.iter().map(|r| i64::from(r.recipient_count)).sum(),
        emails_delivered: records.iter().map(|r| i64::from(r.success_count)).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{communication::MessageKind, guest::GuestDraft};

    fn guest(email: &str, status: GuestStatus) -> Guest {
        Guest::new("ev".into(), GuestDraft { name: "G".into(), email: email.into(), status, message: None })
    }

    #[test]
    fn test_summarize() {
        let guests = vec![
            guest("a@x.com", GuestStatus::Confirmed),
            guest("b@x.com", GuestStatus::Declined),
            guest("c@x.com", GuestStatus::Pending),
        ];
        let records = vec![CommunicationRecord::new("ev".into(), MessageKind::Reminder, "Hi".into(), 3, 2)];

        let stats = summarize("ev", Some(10), &guests, &records);
        assert_eq!(stats.total_guests, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.response_rate, 67);
        assert_eq!(stats.capacity_remaining, Some(9));
        assert_eq!(stats.emails_attempted, 3);
        assert_eq!(stats.emails_delivered, 2);
    }

    #[test]
    fn test_empty_event() {
        let stats = summarize("ev", None, &[], &[]);
        assert_eq!(stats.response_rate, 0);
        assert_eq!(stats.capacity_remaining, None);
    }
}
