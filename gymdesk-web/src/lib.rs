//! # Gymdesk Web Utilities
//!
//! Middleware and extractors shared by the Gymdesk HTTP API.
//!
//! - **Errors**: [`WebError`] renders every failure as the
//!   `{success: false, message, errors?}` envelope
//! - **Middleware**: admin JWT auth, fixed-window rate limiting, CORS, request ids
//! - **Extractors**: validated JSON bodies plus envelope-rejecting path and query params

pub mod errors;
pub mod extractors;
pub mod middleware;

// Re-export commonly used types and functions
pub use errors::{WebError, WebResult};
pub use extractors::{PathParams, QueryParams, ValidatedJson};
pub use middleware::{
    cors_layer, envelope_error_responses, handle_not_found, rate_limit_middleware, request_id_middleware,
    require_admin, AuthContext, IssuedToken, JwtManager, RateLimiter, RequestId, REQUEST_ID_HEADER,
};
