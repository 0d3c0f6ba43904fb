use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use health_dashboard::shared::error::{error_codes, ErrorResponse};

/// Main error type for the dashboard API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validation-specific errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {0}")]
    MissingField(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid value for field: {0}")]
    InvalidValue(String),

    #[error("Batch size {0} exceeds maximum of {1} readings")]
    BatchSizeExceeded(usize, usize),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl ValidationError {
    /// Classify a JSON extractor rejection
    ///
    /// Serde reports absent required fields as `missing field \`name\``;
    /// those become [`ValidationError::MissingField`] so clients get a
    /// stable code. Other data errors (wrong types) map to `InvalidFormat`
    /// and syntax-level failures to `InvalidBody`.
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        match &rejection {
            JsonRejection::JsonDataError(_) => {
                let detail = rejection.body_text();
                match detail.split('`').nth(1) {
                    Some(field) if detail.contains("missing field") => {
                        ValidationError::MissingField(field.to_string())
                    }
                    _ => ValidationError::InvalidFormat(detail),
                }
            }
            JsonRejection::JsonSyntaxError(_) => ValidationError::InvalidBody(rejection.body_text()),
            _ => ValidationError::InvalidBody(rejection.body_text()),
        }
    }
}

impl From<health_dashboard::validators::ValidationError> for ApiError {
    fn from(err: health_dashboard::validators::ValidationError) -> Self {
        ApiError::Validation(ValidationError::InvalidValue(format!(
            "{}: {}",
            err.field, err.message
        )))
    }
}

impl ApiError {
    fn status_code_and_payload(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Validation(ValidationError::MissingField(field)) => (
                StatusCode::BAD_REQUEST,
                error_codes::MISSING_FIELD,
                format!("Required field missing: {}", field),
            ),
            ApiError::Validation(ValidationError::InvalidFormat(detail)) => (
                StatusCode::BAD_REQUEST,
                error_codes::INVALID_FORMAT,
                format!("Invalid format: {}", detail),
            ),
            ApiError::Validation(ValidationError::InvalidValue(detail)) => (
                StatusCode::BAD_REQUEST,
                error_codes::INVALID_VALUE,
                format!("Invalid value for field: {}", detail),
            ),
            ApiError::Validation(ValidationError::BatchSizeExceeded(size, max)) => (
                StatusCode::BAD_REQUEST,
                error_codes::BATCH_SIZE_EXCEEDED,
                format!("Batch size {} exceeds maximum of {} readings", size, max),
            ),
            ApiError::Validation(ValidationError::InvalidBody(msg)) => (
                StatusCode::BAD_REQUEST,
                error_codes::INVALID_FORMAT,
                msg.clone(),
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                error_codes::NOT_FOUND,
                what.clone(),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                String::from("Internal server error occurred"),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status, error_code, message) = self.status_code_and_payload();

        if status.is_server_error() {
            error!(request_id = %request_id, error = %self, "Request failed");
        } else {
            warn!(request_id = %request_id, error = %self, "Request rejected");
        }

        let body = ErrorResponse::new(error_code, message, request_id);
        (status, Json(body)).into_response()
    }
}
