use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Invitation,
    Reminder,
    Update,
    Announcement,
    Custom,
}

#[derive(Debug, Error)]
#[error("unknown message type `{0}`")]
pub struct UnknownKind(pub String);

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Invitation => "invitation",
            MessageKind::Reminder => "reminder",
            MessageKind::Update => "update",
            MessageKind::Announcement => "announcement",
            MessageKind::Custom => "custom",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invitation" => Ok(MessageKind::Invitation),
            "reminder" => Ok(MessageKind::Reminder),
            // older templates were saved as "confirmation"
            "update" | "confirmation" => Ok(MessageKind::Update),
            "announcement" => Ok(MessageKind::Announcement),
            "custom" => Ok(MessageKind::Custom),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for MessageKind {
    type Error = UnknownKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EmailTemplate {
    pub id: String,
    pub organizer_id: String,
    pub event_id: Option<String>,
    pub name: String,
    pub subject: String,
    pub body: String,
    #[sqlx(try_from = "String")]
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmailTemplate {
    pub fn new(organizer_id: String, event_id: Option<String>, name: String, subject: String, body: String, kind: MessageKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            organizer_id,
            event_id,
            name,
            subject,
            body,
            kind,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateFilter {
    pub id: Option<String>,
    pub organizer_id: Option<String>,
    /// Matches templates scoped to this event plus global ones.
    pub visible_for_event: Option<String>,
}

impl TemplateFilter {
    pub fn owned(organizer_id: &str, template_id: &str) -> Self {
        Self {
            id: Some(template_id.to_string()),
            organizer_id: Some(organizer_id.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub kind: Option<MessageKind>,
}

/// Append-only log entry, one per dispatch batch.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CommunicationRecord {
    pub id: String,
    pub event_id: String,
    #[sqlx(try_from = "String")]
    pub kind: MessageKind,
    pub subject: String,
    pub recipient_count: i32,
    pub success_count: i32,
    pub sent_at: DateTime<Utc>,
}

impl CommunicationRecord {
    pub fn new(event_id: String, kind: MessageKind, subject: String, recipient_count: usize, success_count: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            kind,
            subject,
            recipient_count: recipient_count as i32,
            success_count: success_count as i32,
            sent_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub event_id: Option<String>,
    pub event_ids: Option<Vec<String>>,
}

/// Per-recipient outcome of a dispatch batch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub success: bool,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryResult {
    pub fn sent(email: &str) -> Self {
        Self { success: true, email: email.to_string(), error: None }
    }

    pub fn failed(email: &str, error: String) -> Self {
        Self { success: false, email: email.to_string(), error: Some(error) }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}
