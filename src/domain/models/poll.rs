use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Poll {
    pub id: String,
    pub event_id: String,
    pub question: String,
    pub options: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl Poll {
    pub fn new(event_id: String, question: String, options: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            question,
            options: Json(options),
            created_at: Utc::now(),
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct PollFilter {
    pub id: Option<String>,
    pub event_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PollResponse {
    pub id: String,
    pub poll_id: String,
    pub guest_id: String,
    pub selected_option: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PollResponse {
    pub fn new(poll_id: String, guest_id: String, selected_option: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            poll_id,
            guest_id,
            selected_option,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseFilter {
    pub poll_id: Option<String>,
    pub guest_id: Option<String>,
}

/// The option chosen by a guest, given either by position or by its text.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum OptionChoice {
    Index(usize),
    Value(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OptionTally {
    pub option: String,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PollResults {
    pub poll_id: String,
    pub question: String,
    pub total_responses: usize,
    pub results: Vec<OptionTally>,
}
