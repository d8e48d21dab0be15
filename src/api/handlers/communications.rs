use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{CreateTemplateRequest, DispatchRequest, PlaceholderParams, TemplateListParams, UpdateTemplateRequest},
    responses::{ApiResponse, DispatchResponse},
};
use crate::api::extractors::organizer::OrganizerId;
use crate::api::handlers::{parse_kind, parse_status};
use crate::domain::models::{
    communication::{EmailTemplate, MessageKind, RecordFilter, TemplateFilter, TemplatePatch},
    event::Event,
    guest::{Guest, GuestFilter},
};
use crate::domain::services::{dispatch::MessageDraft, placeholders::placeholders_for};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("Template {} is required", field)));
    }
    Ok(value.to_string())
}

async fn owned_template(state: &AppState, organizer_id: &str, template_id: &str) -> Result<EmailTemplate, AppError> {
    state.communication_repo.select_templates(&TemplateFilter::owned(organizer_id, template_id)).await?
        .pop()
        .ok_or_else(|| AppError::not_found("Template"))
}

pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Query(params): Query<TemplateListParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = TemplateFilter {
        organizer_id: Some(organizer_id),
        visible_for_event: params.event_id,
        ..Default::default()
    };
    let templates = state.communication_repo.select_templates(&filter).await?;
    Ok(Json(ApiResponse::ok(templates)))
}

pub async fn create_template(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&payload.kind)?;
    let name = required("name", &payload.name)?;
    let subject = required("subject", &payload.subject)?;
    let body = required("body", &payload.body)?;

    if let Some(event_id) = &payload.event_id {
        state.guest_service().owned_event(&organizer_id, event_id).await?;
    }

    let template = EmailTemplate::new(organizer_id, payload.event_id, name, subject, body, kind);
    let created = state.communication_repo.insert_template(&template).await?;

    info!("Created email template: {}", created.id);
    Ok(Json(ApiResponse::with_message("Template saved", created)))
}

pub async fn get_template(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(template_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let template = owned_template(&state, &organizer_id, &template_id).await?;
    Ok(Json(ApiResponse::ok(template)))
}

pub async fn update_template(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(template_id): Path<String>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let template = owned_template(&state, &organizer_id, &template_id).await?;

    let patch = TemplatePatch {
        name: payload.name.as_deref().map(|v| required("name", v)).transpose()?,
        subject: payload.subject.as_deref().map(|v| required("subject", v)).transpose()?,
        body: payload.body.as_deref().map(|v| required("body", v)).transpose()?,
        kind: payload.kind.as_deref().map(parse_kind).transpose()?,
    };
    let updated = state.communication_repo.update_template(&template.id, &patch).await?;

    info!("Updated email template: {}", updated.id);
    Ok(Json(ApiResponse::with_message("Template updated", updated)))
}

pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(template_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let removed = state.communication_repo.delete_template(&TemplateFilter::owned(&organizer_id, &template_id)).await?;
    if removed == 0 {
        return Err(AppError::not_found("Template"));
    }
    info!("Deleted email template: {}", template_id);
    Ok(Json(ApiResponse::with_message("Template deleted", serde_json::Value::Null)))
}

pub async fn list_placeholders(Query(params): Query<PlaceholderParams>) -> Result<impl IntoResponse, AppError> {
    let kind = match params.kind.as_deref() {
        Some(raw) => parse_kind(raw)?,
        None => MessageKind::Custom,
    };
    Ok(Json(ApiResponse::ok(placeholders_for(kind))))
}

pub async fn send_communication(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(event_id): Path<String>,
    Json(payload): Json<DispatchRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.guest_service().owned_event(&organizer_id, &event_id).await?;

    let template = match &payload.template_id {
        Some(template_id) => {
            let filter = TemplateFilter {
                visible_for_event: Some(event.id.clone()),
                ..TemplateFilter::owned(&organizer_id, template_id)
            };
            let found = state.communication_repo.select_templates(&filter).await?
                .pop()
                .ok_or_else(|| AppError::not_found("Template"))?;
            Some(found)
        }
        None => None,
    };

    let kind = match payload.kind.as_deref() {
        Some(raw) => parse_kind(raw)?,
        None => template.as_ref().map_or(MessageKind::Custom, |t| t.kind),
    };
    let draft = MessageDraft::resolve(kind, template.as_ref(), payload.subject.as_deref(), payload.body.as_deref());

    let recipients = resolve_recipients(&state, &event, payload.status.as_deref(), payload.guest_ids).await?;
    let report = state.dispatcher().dispatch(&event, &recipients, &draft).await?;

    info!("Dispatched {} to event {}: {}", draft.kind, event.id, report.summary());
    Ok(Json(DispatchResponse::from(report)))
}

pub async fn communication_history(
    State(state): State<Arc<AppState>>,
    OrganizerId(organizer_id): OrganizerId,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.guest_service().owned_event(&organizer_id, &event_id).await?;
    let records = state.communication_repo.select_records(&RecordFilter {
        event_id: Some(event.id),
        ..Default::default()
    }).await?;
    Ok(Json(ApiResponse::ok(records)))
}

/// Explicit guest ids take precedence over the status audience.
pub(super) async fn resolve_recipients(
    state: &AppState,
    event: &Event,
    status: Option<&str>,
    guest_ids: Option<Vec<String>>,
) -> Result<Vec<Guest>, AppError> {
    let filter = match guest_ids {
        Some(ids) => GuestFilter {
            ids: Some(ids),
            ..GuestFilter::by_event(&event.id)
        },
        None => GuestFilter::by_event(&event.id).with_status(parse_status(status)?),
    };
    state.guest_repo.select(&filter).await
}
