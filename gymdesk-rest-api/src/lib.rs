//! # Gymdesk REST API
//!
//! HTTP endpoints for the studio back office: the public forms and schedule
//! feeds used by the website, and the JWT-protected admin API.
//!
//! ## Architecture
//!
//! Handlers receive an [`AppContext`] holding `Arc<dyn RepositoryFactory>`,
//! so tests drive the full router against `mockall` repositories while the
//! server wires in the PostgreSQL implementations from `gymdesk-storage`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gymdesk_rest_api::{create_rest_app, AppConfig, AppContext};
//!
//! # fn example(context: AppContext) {
//! let app = create_rest_app(context, AppConfig::default());
//! // axum::serve(listener, app).await?;
//! # let _ = app;
//! # }
//! ```

pub mod app;
pub mod context;
pub mod errors;
pub mod handlers;
pub mod password;

// Re-export commonly used types
pub use app::{create_rest_app, AppConfig};
pub use context::AppContext;
pub use errors::{RestError, RestResult};
