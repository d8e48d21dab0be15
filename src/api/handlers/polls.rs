use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::{CreatePollRequest, SubmitPollResponseRequest}, responses::ApiResponse};
use crate::api::extractors::organizer::OrganizerId;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_poll(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(event_id): Path<String>,
    Json(payload): Json<CreatePollRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.guest_service().owned_event(&organizer_id, &event_id).await?;
    let poll = state.poll_service().create_poll(&event, &payload.question, &payload.options).await?;
    Ok(Json(ApiResponse::with_message("Poll created", poll)))
}

pub async fn list_polls(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.guest_service().owned_event(&organizer_id, &event_id).await?;
    let polls = state.poll_service().list_polls(&event.id).await?;
    Ok(Json(ApiResponse::ok(polls)))
}

pub async fn poll_results(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let results = state.poll_service().results(&poll_id).await?;
    Ok(Json(ApiResponse::ok(results)))
}

pub async fn submit_response(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<String>,
    Json(payload): Json<SubmitPollResponseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.poll_service();
    let response = match (payload.guest_id.as_deref(), payload.email.as_deref()) {
        (Some(guest_id), _) => service.submit_response(&poll_id, guest_id, &payload.option).await?,
        (None, Some(email)) => service.submit_response_by_email(&poll_id, email, &payload.option).await?,
        (None, None) => return Err(AppError::Validation("Tell us who you are: guest_id or email is required".into())),
    };
    Ok(Json(ApiResponse::with_message("Your answer has been recorded", response)))
}
