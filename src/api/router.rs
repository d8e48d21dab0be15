use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{admin, communications, events, guests, health, polls};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Events
        .route("/api/v1/events", post(events::create_event).get(events::list_events))
        .route("/api/v1/events/{event_id}", get(events::get_event))
        .route("/api/v1/events/{event_id}/stats", get(events::event_stats))

        // Guests
        .route("/api/v1/events/{event_id}/guests", get(guests::list_event_guests).post(guests::add_guest))
        .route("/api/v1/events/{event_id}/guests/export", get(guests::export_guests))
        .route("/api/v1/events/{event_id}/guests/import", post(guests::import_guests))
        .route("/api/v1/guests/bulk", post(guests::bulk_add))
        .route("/api/v1/guests", get(guests::list_all_guests))
        .route("/api/v1/guests/{guest_id}", put(guests::update_guest).delete(guests::delete_guest))

        // Public RSVP
        .route("/api/v1/events/{event_id}/rsvp", post(guests::rsvp))

        // Communication - Templates
        .route("/api/v1/templates", get(communications::list_templates).post(communications::create_template))
        .route("/api/v1/templates/{template_id}", get(communications::get_template).put(communications::update_template).delete(communications::delete_template))
        .route("/api/v1/communications/placeholders", get(communications::list_placeholders))

        // Communication - Dispatch & History
        .route("/api/v1/events/{event_id}/communications", post(communications::send_communication).get(communications::communication_history))

        // Polls
        .route("/api/v1/events/{event_id}/polls", get(polls::list_polls).post(polls::create_poll))
        .route("/api/v1/polls/{poll_id}/results", get(polls::poll_results))
        .route("/api/v1/polls/{poll_id}/responses", post(polls::submit_response))

        // Admin
        .route("/api/v1/admin/announcements", post(admin::send_announcement))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        organizer_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
