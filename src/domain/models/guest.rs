use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum GuestStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
}

#[derive(Debug, Error)]
#[error("unknown guest status `{0}` (expected pending, confirmed or declined)")]
pub struct UnknownStatus(pub String);

impl GuestStatus {
    pub const ALL: [GuestStatus; 3] = [GuestStatus::Pending, GuestStatus::Confirmed, GuestStatus::Declined];

    pub fn as_str(&self) -> &'static str {
        match self {
            GuestStatus::Pending => "pending",
            GuestStatus::Confirmed => "confirmed",
            GuestStatus::Declined => "declined",
        }
    }

    pub fn is_response(&self) -> bool {
        *self != GuestStatus::Pending
    }
}

impl fmt::Display for GuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(GuestStatus::Pending),
            "confirmed" => Ok(GuestStatus::Confirmed),
            "declined" => Ok(GuestStatus::Declined),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for GuestStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A validated guest row that has not been assigned to an event yet.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GuestDraft {
    pub name: String,
    pub email: String,
    pub status: GuestStatus,
    pub message: Option<String>,
}

impl GuestDraft {
    pub fn email_key(&self) -> String {
        normalize_email(&self.email)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Guest {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub status: GuestStatus,
    pub message: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guest {
    pub fn new(event_id: String, draft: GuestDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            name: draft.name,
            email: draft.email,
            status: draft.status,
            message: draft.message,
            responded_at: draft.status.is_response().then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn email_key(&self) -> String {
        normalize_email(&self.email)
    }
}

/// Emails are compared case-insensitively everywhere.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct GuestFilter {
    pub id: Option<String>,
    pub ids: Option<Vec<String>>,
    pub event_id: Option<String>,
    pub event_ids: Option<Vec<String>>,
    pub emails: Option<Vec<String>>,
    pub status: Option<GuestStatus>,
}

impl GuestFilter {
    pub fn by_id(id: &str) -> Self {
        Self { id: Some(id.to_string()), ..Default::default() }
    }

    pub fn by_event(event_id: &str) -> Self {
        Self { event_id: Some(event_id.to_string()), ..Default::default() }
    }

    pub fn by_event_and_email(event_id: &str, email: &str) -> Self {
        Self {
            event_id: Some(event_id.to_string()),
            emails: Some(vec![normalize_email(email)]),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: Option<GuestStatus>) -> Self {
        self.status = status;
        self
    }
}

/// Partial update. `responded_at: Some(None)` clears the timestamp.
#[derive(Debug, Clone, Default)]
pub struct GuestPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<GuestStatus>,
    pub message: Option<Option<String>>,
    pub responded_at: Option<Option<DateTime<Utc>>>,
}

impl GuestPatch {
    /// Applies the response timestamp rule for a status change.
    pub fn with_status(mut self, status: GuestStatus) -> Self {
        self.status = Some(status);
        self.responded_at = Some(status.is_response().then(Utc::now));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("Confirmed".parse::<GuestStatus>().unwrap(), GuestStatus::Confirmed);
        assert_eq!(" declined ".parse::<GuestStatus>().unwrap(), GuestStatus::Declined);
        assert!("maybe".parse::<GuestStatus>().is_err());
    }

    #[test]
    fn test_new_guest_stamps_response_time_only_when_answered() {
        let pending = Guest::new("ev".into(), GuestDraft {
            name: "A".into(), email: "a@x.com".into(), status: GuestStatus::Pending, message: None,
        });
        assert!(pending.responded_at.is_none());

        let confirmed = Guest::new("ev".into(), GuestDraft {
            name: "B".into(), email: "b@x.com".into(), status: GuestStatus::Confirmed, message: None,
        });
        assert!(confirmed.responded_at.is_some());
    }

    #[test]
    fn test_patch_clears_response_time_when_back_to_pending() {
        let patch = GuestPatch::default().with_status(GuestStatus::Pending);
        assert_eq!(patch.responded_at, Some(None));

        let patch = GuestPatch::default().with_status(GuestStatus::Declined);
        assert!(matches!(patch.responded_at, Some(Some(_))));
    }
}
