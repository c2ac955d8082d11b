//! Web-specific error types and conversions
//!
//! Every error renders as the `{success: false, message, errors?}` envelope.
//! Internal failures log their cause and answer with a fixed message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gymdesk_api_types::ApiEnvelope;
use gymdesk_interfaces::DatabaseError;
use thiserror::Error;
use tracing::error;

/// Message sent in place of any 5xx cause
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message sent when the rate limiter rejects a request
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";

/// Web-specific error type for HTTP API operations
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Validation error: {errors:?}")]
    Validation { errors: Vec<String> },

    #[error("Rate limit exceeded")]
    RateLimit,
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::BadRequest { .. } | WebError::Validation { .. } => StatusCode::BAD_REQUEST,
            WebError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            WebError::Forbidden { .. } => StatusCode::FORBIDDEN,
            WebError::NotFound { .. } => StatusCode::NOT_FOUND,
            WebError::Conflict { .. } => StatusCode::CONFLICT,
            WebError::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            WebError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            WebError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The envelope for this error, with 5xx causes hidden
    pub fn envelope(&self) -> ApiEnvelope<()> {
        match self {
            WebError::BadRequest { message }
            | WebError::Unauthorized { message }
            | WebError::Forbidden { message }
            | WebError::NotFound { message }
            | WebError::Conflict { message } => ApiEnvelope::failure(message.clone()),
            WebError::Validation { errors } => {
                ApiEnvelope::validation_failure("Validation failed", errors.clone())
            }
            WebError::RateLimit => ApiEnvelope::failure(RATE_LIMIT_MESSAGE),
            WebError::ServiceUnavailable { .. } => ApiEnvelope::failure("Service unavailable"),
            WebError::Internal { .. } => ApiEnvelope::failure(INTERNAL_ERROR_MESSAGE),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }

        (status, Json(self.envelope())).into_response()
    }
}

impl From<DatabaseError> for WebError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, .. } => WebError::not_found(format!("{} not found", entity)),
            DatabaseError::Validation { message } => WebError::bad_request(message),
            DatabaseError::Constraint { message } => WebError::conflict(message),
            other => WebError::internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for WebError {
    fn from(errors: validator::ValidationErrors) -> Self {
        WebError::Validation {
            errors: flatten_validation_errors(&errors),
        }
    }
}

/// One human-readable line per failed rule, sorted for stable output
pub fn flatten_validation_errors(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut lines: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();

    lines.sort();
    lines.dedup();
    lines
}

// Common error constructors
impl WebError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        WebError::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        WebError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        WebError::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        WebError::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        WebError::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        WebError::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        WebError::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn validation_single(message: impl Into<String>) -> Self {
        WebError::Validation {
            errors: vec![message.into()],
        }
    }
}
