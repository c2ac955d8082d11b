//! Request handlers, one module per resource

pub mod admins;
pub mod auth;
pub mod catalog;
pub mod events;
pub mod health;
pub mod members;
pub mod newsletter;
pub mod registrations;
