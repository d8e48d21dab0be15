use axum::{extract::FromRequestParts, http::request::Parts};
use crate::error::AppError;
use tracing::Span;

pub const ORGANIZER_HEADER: &str = "x-organizer-id";

/// Organizer asserted by the fronting platform. Sessions are handled there,
/// this service only trusts the header.
pub struct OrganizerId(pub String);

impl<S> FromRequestParts<S> for OrganizerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let organizer_id = parts.headers.get(ORGANIZER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?;

        Span::current().record("organizer_id", organizer_id);

        Ok(OrganizerId(organizer_id.to_string()))
    }
}
