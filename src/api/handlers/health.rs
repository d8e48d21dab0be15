use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match state.event_repo.find_by_id("health-probe").await {
        Ok(_) => "ok",
        Err(_) => "unavailable",
    };
    Json(json!({ "status": "ok", "database": database }))
}
