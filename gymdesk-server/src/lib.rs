//! Gymdesk HTTP server
//!
//! Wraps the REST router in the process-wide middleware stack (CORS, request
//! ids, tracing, timeouts, body limits) and serves it until a shutdown
//! signal arrives.

pub mod startup;

pub use startup::Server;
