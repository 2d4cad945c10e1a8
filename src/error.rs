//! Error types for the Gather services

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::date_time;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ApiError {
    pub errors: Vec<String>,
    pub message: String,
    pub reason: String,
    pub status: String,
    #[serde(with = "date_time")]
    pub timestamp: NaiveDateTime,
}

impl AppError {
    fn status_parts(&self) -> (StatusCode, &'static str, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Not found.",
                msg.clone(),
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Incorrectly made request.",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Integrity constraint has been violated.",
                msg.clone(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Internal server error.",
                    "An unexpected error has occurred".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Internal server error.",
                    "An unexpected error has occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, status_text, reason, message) = self.status_parts();

        let body = Json(ApiError {
            errors: Vec::new(),
            message,
            reason: reason.to_string(),
            status: status_text.to_string(),
            timestamp: Utc::now().naive_utc(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let (status, text, reason, _) = AppError::NotFound("x".into()).status_parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(text, "NOT_FOUND");
        assert_eq!(reason, "Not found.");

        let (status, _, reason, _) = AppError::Conflict("x".into()).status_parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(reason, "Integrity constraint has been violated.");

        let (status, _, _, _) = AppError::Validation("x".into()).status_parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let (_, _, _, message) = AppError::Internal("secret detail".into()).status_parts();
        assert_eq!(message, "An unexpected error has occurred");
    }
}
