use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::{dtos::{requests::CreateEventRequest, responses::ApiResponse}, extractors::organizer::OrganizerId};
use crate::domain::models::{
    communication::RecordFilter,
    event::{Event, EventFilter},
    guest::GuestFilter,
};
use crate::domain::services::analytics::summarize;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Event title is required".into()));
    }
    if let Some(capacity) = payload.capacity
        && capacity < 0
    {
        return Err(AppError::Validation("Capacity must not be negative".into()));
    }

    let event = Event::new(organizer_id, title.to_string(), payload.starts_at, payload.location.trim().to_string(), payload.capacity);
    let created = state.event_repo.insert(&event).await?;

    info!("Created event {}", created.id);
    Ok(Json(ApiResponse::with_message("Event created", created)))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.select(&EventFilter::by_organizer(&organizer_id)).await?;
    Ok(Json(ApiResponse::ok(events)))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.guest_service().owned_event(&organizer_id, &event_id).await?;
    Ok(Json(ApiResponse::ok(event)))
}

pub async fn event_stats(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.guest_service().owned_event(&organizer_id, &event_id).await?;

    let guests = state.guest_repo.select(&GuestFilter::by_event(&event.id)).await?;
    let records = state.communication_repo.select_records(&RecordFilter {
        event_id: Some(event.id.clone()),
        ..Default::default()
    }).await?;

    Ok(Json(ApiResponse::ok(summarize(&event.id, event.capacity, &guests, &records))))
}
