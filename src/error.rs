use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::reservation::Reservation;

#[derive(Debug, Error)]
pub enum AppError {
    /// The requested range overlaps an existing reservation for the vehicle.
    #[error("vehicle is not available for the selected dates (conflicts with reservation {})", .0.id)]
    Conflict(Box<Reservation>),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::validation(field, "is required")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, body) = match self {
            AppError::Conflict(reservation) => (
                StatusCode::CONFLICT,
                json!({
                    "error": message,
                    "conflictingReservation": reservation,
                }),
            ),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            AppError::Validation { field, .. } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": message,
                    "field": field,
                }),
            ),
            AppError::Storage(_) | AppError::Internal(_) => {
                tracing::error!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}
