//! API error types with IntoResponse
//!
//! Every failure path renders JSON: 4xx with a human-readable message,
//! 5xx with the detail logged and a generic body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request input failed shape/range/allow-list checks (400)
    Validation(Vec<ValidationError>),

    /// Resource, or resource-under-parent, absent (404)
    NotFound { resource: &'static str },

    /// Store-level uniqueness conflict (409)
    Conflict { message: String },

    /// Unexpected store failure (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation failed",
                    "errors": errors
                        .iter()
                        .map(|e| json!({ "field": e.field(), "message": e.to_string() }))
                        .collect::<Vec<_>>(),
                }),
            ),
            Self::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{resource} not found") }),
            ),
            Self::Conflict { message } => (StatusCode::CONFLICT, json!({ "error": message })),
            Self::Database(e) => {
                // Log the actual error, return a generic message
                tracing::error!("database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(vec![e])
    }
}

impl From<Vec<ValidationError>> for ApiError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        if e.is_unique_violation() {
            Self::Conflict {
                message: "username or email already taken".into(),
            }
        } else {
            Self::Database(e)
        }
    }
}
