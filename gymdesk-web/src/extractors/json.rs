//! Body, path and query extractors that reject with the JSON envelope

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::WebError;

/// JSON body that has been deserialized and validated.
///
/// Malformed JSON and failed rules both become 400 responses; the latter list
/// every failed rule in `errors`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> WebError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            WebError::bad_request("Expected request with `Content-Type: application/json`")
        }
        JsonRejection::JsonSyntaxError(e) => WebError::Validation {
            errors: vec![format!("Malformed JSON: {}", e.body_text())],
        },
        JsonRejection::JsonDataError(e) => WebError::Validation {
            errors: vec![e.body_text()],
        },
        other => WebError::bad_request(other.body_text()),
    }
}

/// Path parameters; a non-numeric id is a 400 rather than a plain-text reply
#[derive(Debug, Clone)]
pub struct PathParams<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| WebError::bad_request(format!("Invalid path parameter: {}", e.body_text())))?;
        Ok(PathParams(value))
    }
}

/// Query string parameters
#[derive(Debug, Clone, Default)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| WebError::bad_request(format!("Invalid query string: {}", e.body_text())))?;
        Ok(QueryParams(value))
    }
}
