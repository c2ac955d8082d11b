//! Core interfaces for Gymdesk
//!
//! Repository traits are the seam between the HTTP layer and PostgreSQL: the
//! API crate only ever sees `Arc<dyn RepositoryFactory>`, and tests swap in
//! the `mockall` doubles generated under the `mocks` feature.

pub mod database;

pub use database::*;
