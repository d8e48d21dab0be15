use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::warn;

pub struct AdminToken;

impl FromRequestParts<Arc<AppState>> for AdminToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.admin_api_token.as_deref() else {
            warn!("Admin route called but ADMIN_API_TOKEN is not configured");
            return Err(AppError::Unauthorized);
        };

        let provided = parts.headers.get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        if provided != expected {
            warn!("Rejected admin request with invalid token");
            return Err(AppError::Unauthorized);
        }

        Ok(AdminToken)
    }
}
