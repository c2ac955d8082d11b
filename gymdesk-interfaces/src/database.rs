//! Database repository interfaces
//!
//! One trait per aggregate the API touches. Implementations live in
//! `gymdesk-storage`; handlers reach them through [`RepositoryFactory`].

use async_trait::async_trait;
use chrono::NaiveDate;
use gymdesk_api_types::{
    Admin, AdminRole, Category, ClassIteration, CreateCategoryRequest, CreateClassIterationRequest,
    CreateEnrollmentRequest, CreateEventRequest, CreateProgramRequest, CreateRegistrationRequest,
    Enrollment, Event, Member, MemberStatus, NewsletterSignupRequest, NewsletterSubscriber, Program,
    ProgramWithSchedule, Registration, RegistrationStatus, UpdateCategoryRequest,
    UpdateClassIterationRequest, UpdateEventRequest, UpdateProgramRequest, UpdateRegistrationRequest,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "mocks")]
use mockall::automock;

/// Common database error type
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Unique or foreign-key violation
    #[error("Constraint violation: {message}")]
    Constraint { message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Transaction error: {message}")]
    Transaction { message: String },

    #[error("Internal database error: {message}")]
    Internal { message: String },
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        DatabaseError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DatabaseError::Internal {
            message: message.into(),
        }
    }
}

// =============================================================================
// Registrations
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationFilters {
    pub status: Option<RegistrationStatus>,
    pub include_archived: bool,
}

#[cfg_attr(feature = "mocks", automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn create(&self, request: CreateRegistrationRequest) -> Result<Registration, DatabaseError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Registration>, DatabaseError>;

    /// Case-insensitive lookup, archived rows included
    async fn find_by_email(&self, email: &str) -> Result<Option<Registration>, DatabaseError>;

    /// Newest first; archived rows only when the filter asks for them
    async fn list(&self, filters: RegistrationFilters) -> Result<Vec<Registration>, DatabaseError>;

    async fn update(
        &self,
        id: i32,
        changes: UpdateRegistrationRequest,
    ) -> Result<Option<Registration>, DatabaseError>;

    /// Soft delete. Returns false when no row has this id.
    async fn archive(&self, id: i32) -> Result<bool, DatabaseError>;
}

// =============================================================================
// Newsletter
// =============================================================================

#[cfg_attr(feature = "mocks", automock)]
#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    async fn subscribe(&self, request: NewsletterSignupRequest) -> Result<NewsletterSubscriber, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<NewsletterSubscriber>, DatabaseError>;

    async fn reactivate(&self, id: i32) -> Result<Option<NewsletterSubscriber>, DatabaseError>;

    async fn list(&self, active: Option<bool>) -> Result<Vec<NewsletterSubscriber>, DatabaseError>;

    async fn unsubscribe(&self, id: i32) -> Result<bool, DatabaseError>;
}

// =============================================================================
// Members
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberFilters {
    /// Matches first name, last name or email
    pub search: Option<String>,
    pub status: Option<MemberStatus>,
    pub family_id: Option<i32>,
    pub include_archived: bool,
}

/// Member insert; the password is already hashed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMember {
    pub facility_id: Option<i32>,
    pub family_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub status: MemberStatus,
    pub medical_notes: Option<String>,
    pub internal_flags: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub family_id: Option<i32>,
    pub status: Option<MemberStatus>,
    pub medical_notes: Option<String>,
    pub internal_flags: Option<String>,
    pub password_hash: Option<String>,
}

#[cfg_attr(feature = "mocks", automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, member: NewMember) -> Result<Member, DatabaseError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Member>, DatabaseError>;

    async fn list(&self, filters: MemberFilters) -> Result<Vec<Member>, DatabaseError>;

    async fn update(&self, id: i32, changes: MemberChanges) -> Result<Option<Member>, DatabaseError>;

    /// Sets status `archived` and clears `is_active`
    async fn archive(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn list_enrollments(&self, member_id: i32) -> Result<Vec<Enrollment>, DatabaseError>;

    async fn enroll(&self, member_id: i32, request: CreateEnrollmentRequest) -> Result<Enrollment, DatabaseError>;

    async fn remove_enrollment(&self, member_id: i32, enrollment_id: i32) -> Result<bool, DatabaseError>;
}

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilters {
    pub include_archived: bool,
    /// Only events ending on or after this date
    pub from_date: Option<NaiveDate>,
}

#[cfg_attr(feature = "mocks", automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, request: CreateEventRequest) -> Result<Event, DatabaseError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, DatabaseError>;

    /// Ordered by event date, soonest first
    async fn list(&self, filters: EventFilters) -> Result<Vec<Event>, DatabaseError>;

    async fn update(&self, id: i32, changes: UpdateEventRequest) -> Result<Option<Event>, DatabaseError>;

    async fn archive(&self, id: i32) -> Result<bool, DatabaseError>;
}

// =============================================================================
// Catalog
// =============================================================================

#[cfg_attr(feature = "mocks", automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, request: CreateCategoryRequest) -> Result<Category, DatabaseError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DatabaseError>;

    async fn list(&self, include_archived: bool) -> Result<Vec<Category>, DatabaseError>;

    async fn update(&self, id: i32, changes: UpdateCategoryRequest) -> Result<Option<Category>, DatabaseError>;

    async fn archive(&self, id: i32) -> Result<bool, DatabaseError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramFilters {
    pub category_id: Option<i32>,
    pub active_only: bool,
    pub include_archived: bool,
}

#[cfg_attr(feature = "mocks", automock)]
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn create(&self, request: CreateProgramRequest) -> Result<Program, DatabaseError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Program>, DatabaseError>;

    async fn list(&self, filters: ProgramFilters) -> Result<Vec<Program>, DatabaseError>;

    async fn update(&self, id: i32, changes: UpdateProgramRequest) -> Result<Option<Program>, DatabaseError>;

    async fn archive(&self, id: i32) -> Result<bool, DatabaseError>;

    /// Active programs with their category and active iterations
    async fn catalog(&self) -> Result<Vec<ProgramWithSchedule>, DatabaseError>;
}

#[cfg_attr(feature = "mocks", automock)]
#[async_trait]
pub trait ClassIterationRepository: Send + Sync {
    async fn create(
        &self,
        program_id: i32,
        request: CreateClassIterationRequest,
    ) -> Result<ClassIteration, DatabaseError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<ClassIteration>, DatabaseError>;

    async fn list_for_program(&self, program_id: i32) -> Result<Vec<ClassIteration>, DatabaseError>;

    async fn update(
        &self,
        id: i32,
        changes: UpdateClassIterationRequest,
    ) -> Result<Option<ClassIteration>, DatabaseError>;

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError>;
}

// =============================================================================
// Admin accounts
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct NewAdmin {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: AdminRole,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<AdminRole>,
    pub is_active: Option<bool>,
}

/// Admin row together with its bcrypt hash, only used for login
#[derive(Debug, Clone, PartialEq)]
pub struct AdminCredentials {
    pub admin: Admin,
    pub password_hash: String,
}

#[cfg_attr(feature = "mocks", automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, admin: NewAdmin) -> Result<Admin, DatabaseError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Admin>, DatabaseError>;

    async fn find_credentials(&self, email: &str) -> Result<Option<AdminCredentials>, DatabaseError>;

    async fn list(&self) -> Result<Vec<Admin>, DatabaseError>;

    async fn update(&self, id: i32, changes: AdminChanges) -> Result<Option<Admin>, DatabaseError>;

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn count_active(&self) -> Result<u64, DatabaseError>;

    async fn record_login(&self, id: i32) -> Result<(), DatabaseError>;
}

// =============================================================================
// Factory
// =============================================================================

/// Repository factory for creating repository instances
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    fn registration_repository(&self) -> &dyn RegistrationRepository;

    fn newsletter_repository(&self) -> &dyn NewsletterRepository;

    fn member_repository(&self) -> &dyn MemberRepository;

    fn event_repository(&self) -> &dyn EventRepository;

    fn category_repository(&self) -> &dyn CategoryRepository;

    fn program_repository(&self) -> &dyn ProgramRepository;

    fn class_iteration_repository(&self) -> &dyn ClassIterationRepository;

    fn admin_repository(&self) -> &dyn AdminRepository;

    /// Check health of the underlying connection
    async fn health_check(&self) -> Result<(), DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_deserialize_from_partial_query() {
        let filters: RegistrationFilters = serde_json::from_str(r#"{"status":"contacted"}"#).unwrap();
        assert_eq!(filters.status, Some(RegistrationStatus::Contacted));
        assert!(!filters.include_archived);
    }

    #[test]
    fn test_not_found_message() {
        let err = DatabaseError::not_found("registration", 42);
        assert_eq!(err.to_string(), "Entity not found: registration with id 42");
    }
}
