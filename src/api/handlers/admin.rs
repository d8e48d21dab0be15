use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::AnnouncementRequest, responses::DispatchResponse};
use crate::api::extractors::admin::AdminToken;
use crate::api::handlers::communications::resolve_recipients;
use crate::domain::models::communication::MessageKind;
use crate::domain::services::dispatch::MessageDraft;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Announcement dispatch for platform maintenance tooling; bypasses organizer
/// ownership and is guarded by the admin bearer token instead.
pub async fn send_announcement(
    State(state): State<Arc<AppState>>,
    _admin: AdminToken,
    Json(payload): Json<AnnouncementRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&payload.event_id).await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    let draft = MessageDraft::resolve(
        MessageKind::Announcement,
        None,
        payload.subject.as_deref(),
        payload.body.as_deref(),
    );
    let recipients = resolve_recipients(&state, &event, payload.status.as_deref(), None).await?;
    let report = state.dispatcher().dispatch(&event, &recipients, &draft).await?;

    info!("Admin announcement for event {}: {}", event.id, report.summary());
    Ok(Json(DispatchResponse::from(report)))
}
