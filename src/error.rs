use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("Mail transport error: {0}")]
    Transport(String),
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// Absence and foreign ownership share one message.
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found or you do not have permission", what))
    }

    pub fn is_unique_violation(&self) -> bool {
        if let AppError::Database(e) = self
            && let Some(db_err) = e.as_database_error()
        {
            let code = db_err.code().unwrap_or_default();
            // 2067 = SQLite Unique Constraint
            // 23505 = PostgreSQL Unique Violation
            return code == "2067" || code == "23505";
        }
        false
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_unique_violation() {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "success": false, "message": "Resource already exists (duplicate entry)" }))
            ).into_response();
        }

        let (status, message) = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            // Rejected input is a handled outcome, reported in the body.
            AppError::Validation(msg) => (StatusCode::OK, msg.clone()),
            AppError::Transport(msg) => {
                error!("Mail transport error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Mail delivery failed".to_string())
            }
            AppError::Template(e) => {
                error!("Template error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}
