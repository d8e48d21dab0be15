pub mod admin;
pub mod communications;
pub mod events;
pub mod guests;
pub mod health;
pub mod polls;

use crate::domain::models::{communication::MessageKind, guest::GuestStatus};
use crate::error::AppError;

fn parse_status(raw: Option<&str>) -> Result<Option<GuestStatus>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all")) {
        None => Ok(None),
        Some(s) => s.parse::<GuestStatus>().map(Some).map_err(|e| AppError::Validation(e.to_string())),
    }
}

fn parse_kind(raw: &str) -> Result<MessageKind, AppError> {
    raw.parse::<MessageKind>().map_err(|e| AppError::Validation(e.to_string()))
}
