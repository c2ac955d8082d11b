pub mod auth;
pub mod cors;
pub mod error_handler;
pub mod rate_limit;
pub mod request_id;

// Re-export layer creation functions
pub use auth::{require_admin, AuthContext, IssuedToken, JwtClaims, JwtManager};
pub use cors::cors_layer;
pub use error_handler::{envelope_error_responses, handle_not_found};
pub use rate_limit::{rate_limit_middleware, RateDecision, RateLimiter};
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
