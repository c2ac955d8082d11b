//! Authentication extractors for Axum

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{errors::WebError, middleware::AuthContext};

/// Available on routes behind [`crate::middleware::require_admin`]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| WebError::unauthorized("Authentication required"))
    }
}
