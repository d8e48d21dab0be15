use axum::{
    extract::{State, Path, Query},
    http::header,
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{AddGuestRequest, BulkAddRequest, GuestListParams, ImportParams, RsvpRequest, UpdateGuestRequest},
    responses::{ApiResponse, BulkAddResponse},
};
use crate::api::extractors::organizer::OrganizerId;
use crate::api::handlers::parse_status;
use crate::domain::services::{
    export::guests_to_csv,
    guest_import::{parse_guest_input, validate_guest, Cell, InputFormat},
    guest_service::{GuestChanges, RsvpInput},
};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{debug, info};

pub async fn list_event_guests(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(event_id): Path<String>,
    Query(params): Query<GuestListParams>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_status(params.status.as_deref())?;
    let guests = state.guest_service().list_for_event(&organizer_id, &event_id, status).await?;
    Ok(Json(ApiResponse::ok(guests)))
}

pub async fn list_all_guests(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
) -> Result<impl IntoResponse, AppError> {
    let guests = state.guest_service().list_for_organizer(&organizer_id).await?;
    Ok(Json(ApiResponse::ok(guests)))
}

pub async fn add_guest(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(event_id): Path<String>,
    Json(payload): Json<AddGuestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let draft = validate_guest(
        Cell::Text(&payload.name),
        Cell::Text(&payload.email),
        payload.status.as_deref().map_or(Cell::Missing, Cell::Text),
        payload.message.as_deref().map_or(Cell::Missing, Cell::Text),
    ).map_err(AppError::Validation)?;

    let guest = state.guest_service().add_guest(&organizer_id, &event_id, draft).await?;
    Ok(Json(ApiResponse::with_message("Guest added", guest)))
}

pub async fn update_guest(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(guest_id): Path<String>,
    Json(payload): Json<UpdateGuestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let changes = GuestChanges {
        name: payload.name,
        email: payload.email,
        status: parse_status(payload.status.as_deref())?,
        message: payload.message,
    };
    let guest = state.guest_service().update_guest(&organizer_id, &guest_id, changes).await?;
    Ok(Json(ApiResponse::with_message("Guest updated", guest)))
}

pub async fn delete_guest(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(guest_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.guest_service().delete_guest(&organizer_id, &guest_id).await?;
    Ok(Json(ApiResponse::with_message("Guest removed", serde_json::Value::Null)))
}

pub async fn rsvp(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Json(payload): Json<RsvpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = parse_status(Some(payload.status.as_str()))?
        .ok_or_else(|| AppError::Validation("Please choose whether you will attend".into()))?;

    let input = RsvpInput {
        name: payload.name,
        email: payload.email,
        status,
        message: payload.message,
    };
    let guest = state.guest_service().rsvp(&event_id, input).await?;
    Ok(Json(ApiResponse::with_message("Thanks, your response has been saved", guest)))
}

pub async fn export_guests(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let guests = state.guest_service().list_for_event(&organizer_id, &event_id, None).await?;
    info!("Exporting {} guest(s) for event {}", guests.len(), event_id);

    let disposition = format!("attachment; filename=\"guests-{}.csv\"", event_id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        guests_to_csv(&guests),
    ))
}

pub async fn bulk_add(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Json(payload): Json<BulkAddRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.event_ids.is_empty() {
        return Err(AppError::Validation("Select at least one event".into()));
    }
    let response = add_parsed(&state, &organizer_id, &payload.event_ids, &payload.input, payload.format).await?;
    Ok(Json(response))
}

/// Raw file body; `?format=` overrides detection.
pub async fn import_guests(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(event_id): Path<String>,
    Query(params): Query<ImportParams>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let response = add_parsed(&state, &organizer_id, std::slice::from_ref(&event_id), &body, params.format).await?;
    Ok(Json(response))
}

async fn add_parsed(
    state: &AppState,
    organizer_id: &str,
    event_ids: &[String],
    raw: &str,
    format: Option<InputFormat>,
) -> Result<BulkAddResponse, AppError> {
    let parsed = parse_guest_input(raw, format)?;
    if parsed.guests.is_empty() {
        return Ok(BulkAddResponse::rejected("No valid guests found in the input", parsed.errors));
    }

    let mut steps = Vec::with_capacity(event_ids.len());
    let report = state.batch_writer()
        .add_to_events(organizer_id, event_ids, &parsed.guests, |progress| {
            debug!(processed = progress.processed, total = progress.total, "bulk add step");
            steps.push(progress);
        })
        .await;

    info!("{}", report.summary());
    Ok(BulkAddResponse::from_report(report, steps, parsed.errors))
}
