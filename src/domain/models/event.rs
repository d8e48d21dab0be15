use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub organizer_id: String,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(organizer_id: String, title: String, starts_at: DateTime<Utc>, location: String, capacity: Option<i32>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organizer_id,
            title,
            starts_at,
            location,
            capacity,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, organizer_id: &str) -> bool {
        self.organizer_id == organizer_id
    }

    /// Human readable date used in mail bodies and exports.
    pub fn display_date(&self) -> String {
        self.starts_at.format("%A, %B %-d, %Y at %H:%M UTC").to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub id: Option<String>,
    pub ids: Option<Vec<String>>,
    pub organizer_id: Option<String>,
}

impl EventFilter {
    pub fn owned(organizer_id: &str, event_id: &str) -> Self {
        Self {
            id: Some(event_id.to_string()),
            organizer_id: Some(organizer_id.to_string()),
            ..Default::default()
        }
    }

    pub fn by_organizer(organizer_id: &str) -> Self {
        Self {
            organizer_id: Some(organizer_id.to_string()),
            ..Default::default()
        }
    }
}
