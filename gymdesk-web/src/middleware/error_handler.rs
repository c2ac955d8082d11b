use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use gymdesk_api_types::ApiEnvelope;
use tracing::warn;

use crate::errors::WebError;

/// Fallback for unmatched routes
pub async fn handle_not_found() -> WebError {
    WebError::not_found("Route not found")
}

/// Replaces non-JSON error responses from inner layers (timeouts, body
/// limits, method mismatches) with the JSON envelope
pub async fn envelope_error_responses(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    let is_json = response
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let message = match status {
        StatusCode::REQUEST_TIMEOUT => "Request timed out",
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        s if s.is_server_error() => crate::errors::INTERNAL_ERROR_MESSAGE,
        _ => status.canonical_reason().unwrap_or("Request failed"),
    };
    warn!("{} response without JSON body, wrapping as envelope", status);

    (status, Json(ApiEnvelope::failure(message))).into_response()
}
