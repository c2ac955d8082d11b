//! REST API error type
//!
//! Handlers return [`RestError`]; rendering goes through [`WebError`] so every
//! failure shares one envelope and one status mapping.

use axum::response::{IntoResponse, Response};
use gymdesk_interfaces::DatabaseError;
use gymdesk_web::WebError;
use thiserror::Error;

/// REST API specific error type
#[derive(Error, Debug)]
pub enum RestError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Web error: {0}")]
    Web(#[from] WebError),
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

impl RestError {
    /// `"{entity} not found"`
    pub fn not_found(entity: &str) -> Self {
        RestError::NotFound(format!("{} not found", entity))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        RestError::Unauthorized(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        RestError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        RestError::InternalError(message.into())
    }

    pub fn into_web_error(self) -> WebError {
        match self {
            RestError::NotFound(message) => WebError::not_found(message),
            RestError::BadRequest(message) => WebError::bad_request(message),
            RestError::Unauthorized(message) => WebError::unauthorized(message),
            RestError::Forbidden(message) => WebError::forbidden(message),
            RestError::Conflict(message) => WebError::conflict(message),
            RestError::ServiceUnavailable(message) => WebError::service_unavailable(message),
            RestError::InternalError(message) => WebError::internal(message),
            RestError::Database(err) => WebError::from(err),
            RestError::Web(err) => err,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        self.into_web_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RestError::not_found("Member"), StatusCode::NOT_FOUND),
            (RestError::bad_request("bad"), StatusCode::BAD_REQUEST),
            (RestError::conflict("dup"), StatusCode::CONFLICT),
            (RestError::unauthorized("no"), StatusCode::UNAUTHORIZED),
            (
                RestError::Database(DatabaseError::Constraint {
                    message: "duplicate key".to_string(),
                }),
                StatusCode::CONFLICT,
            ),
            (
                RestError::Database(DatabaseError::Connection {
                    message: "refused".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_not_found_message() {
        let web = RestError::not_found("Event").into_web_error();
        assert_eq!(web.envelope().message.as_deref(), Some("Event not found"));
    }

    #[test]
    fn test_internal_cause_is_hidden() {
        let web = RestError::internal("connection reset by peer").into_web_error();
        assert_eq!(web.envelope().message.as_deref(), Some("Internal server error"));
    }
}
