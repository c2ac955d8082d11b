//! Logging initialisation for Gymdesk binaries
//!
//! Everything logs through `tracing`; this crate only decides how the
//! subscriber filters and formats events.

pub mod init;

pub use init::{build_env_filter, init_logging, init_simple_tracing};
