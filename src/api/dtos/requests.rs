use crate::domain::models::poll::OptionChoice;
use crate::domain::services::guest_import::InputFormat;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub capacity: Option<i32>,
}

#[derive(Deserialize)]
pub struct AddGuestRequest {
    pub name: String,
    pub email: String,
    pub status: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateGuestRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct RsvpRequest {
    pub name: String,
    pub email: String,
    pub status: String,
    pub message: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct GuestListParams {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct BulkAddRequest {
    pub event_ids: Vec<String>,
    pub input: String,
    pub format: Option<InputFormat>,
}

#[derive(Deserialize, Default)]
pub struct ImportParams {
    pub format: Option<InputFormat>,
}

#[derive(Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub subject: String,
    pub body: String,
    pub kind: String,
    pub event_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub kind: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct TemplateListParams {
    pub event_id: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct PlaceholderParams {
    pub kind: Option<String>,
}

/// Recipients come from `guest_ids` when given, otherwise every guest of the
/// event with the optional `status`.
#[derive(Deserialize)]
pub struct DispatchRequest {
    pub kind: Option<String>,
    pub template_id: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub status: Option<String>,
    pub guest_ids: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct AnnouncementRequest {
    pub event_id: String,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Deserialize)]
pub struct SubmitPollResponseRequest {
    pub guest_id: Option<String>,
    pub email: Option<String>,
    pub option: OptionChoice,
}
