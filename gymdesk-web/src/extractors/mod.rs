pub mod auth;
pub mod json;

// Re-export commonly used extractors
pub use json::{PathParams, QueryParams, ValidatedJson};
