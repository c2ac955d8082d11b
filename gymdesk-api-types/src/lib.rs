//! Gymdesk API types
//!
//! Record types returned by the repositories, request payloads accepted by the
//! HTTP handlers, and the `{success, data, message, errors}` envelope every
//! endpoint answers with.

pub mod domain;
pub mod enums;
pub mod envelope;
pub mod requests;
pub mod time_format;

// Re-export main types for convenience
pub use domain::{
    Admin, Category, ClassIteration, Enrollment, Event, Member, NewsletterSubscriber, Program,
    ProgramWithSchedule, Registration,
};
pub use enums::{
    AdminRole, DurationType, EnrollmentStatus, MemberStatus, ParseEnumError, RegistrationStatus,
};
pub use envelope::ApiEnvelope;
pub use requests::*;
