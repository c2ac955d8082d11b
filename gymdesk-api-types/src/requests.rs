//! Request payloads accepted by the HTTP handlers.
//!
//! Field rules are expressed with `validator` derives; the web layer turns a
//! failed `validate()` into a 400 envelope listing every message.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::enums::*;

/// Emails are compared case-insensitively everywhere
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Deserializers that clean submitted text before `validate()` sees it
mod clean {
    use serde::{Deserialize, Deserializer};

    pub fn email<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        String::deserialize(deserializer).map(|s| super::normalize_email(&s))
    }

    pub fn optional_email<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Option::<String>::deserialize(deserializer).map(|o| o.map(|s| super::normalize_email(&s)))
    }

    pub fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        String::deserialize(deserializer).map(|s| s.trim().to_string())
    }

    pub fn optional_trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Option::<String>::deserialize(deserializer).map(|o| o.map(|s| s.trim().to_string()))
    }
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_days_of_week(days: &[i32]) -> Result<(), ValidationError> {
    if days.is_empty() {
        return Err(rule("days_of_week", "days_of_week must contain at least one day"));
    }
    if days.iter().any(|d| !(0..=6).contains(d)) {
        return Err(rule("days_of_week", "days_of_week values must be between 0 and 6"));
    }
    Ok(())
}

fn check_age_range(min: Option<i32>, max: Option<i32>) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => {
            Err(rule("age_range", "age_min must not be greater than age_max"))
        }
        _ => Ok(()),
    }
}

fn check_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err(rule("date_range", "end date must not be before the start date"))
        }
        _ => Ok(()),
    }
}

fn check_time_range(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end <= start => {
            Err(rule("time_range", "end_time must be after start_time"))
        }
        _ => Ok(()),
    }
}

// =============================================================================
// Public forms
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRegistrationRequest {
    #[validate(length(min = 1, max = 100, message = "first_name is required (max 100 characters)"))]
    #[serde(deserialize_with = "clean::trimmed")]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last_name is required (max 100 characters)"))]
    #[serde(deserialize_with = "clean::trimmed")]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email"))]
    #[serde(deserialize_with = "clean::email")]
    pub email: String,
    #[validate(length(max = 30, message = "phone must be at most 30 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "athlete_name must be at most 100 characters"))]
    pub athlete_name: Option<String>,
    #[validate(range(min = 1, max = 100, message = "athlete_age must be between 1 and 100"))]
    pub athlete_age: Option<i32>,
    #[validate(length(max = 500, message = "interests must be at most 500 characters"))]
    pub interests: Option<String>,
    #[validate(length(max = 2000, message = "message must be at most 2000 characters"))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRegistrationRequest {
    pub status: Option<RegistrationStatus>,
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewsletterSignupRequest {
    #[validate(email(message = "email must be a valid email"))]
    #[serde(deserialize_with = "clean::email")]
    pub email: String,
    #[validate(length(max = 100, message = "first_name must be at most 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 50, message = "source must be at most 50 characters"))]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email"))]
    #[serde(deserialize_with = "clean::email")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

// =============================================================================
// Members
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, max = 100, message = "first_name is required (max 100 characters)"))]
    #[serde(deserialize_with = "clean::trimmed")]
    pub first_name: String,
    #[validate(length(max = 100, message = "last_name must be at most 100 characters"))]
    #[serde(default, deserialize_with = "clean::trimmed")]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email"))]
    #[serde(default, deserialize_with = "clean::optional_email")]
    pub email: Option<String>,
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(length(max = 30, message = "phone must be at most 30 characters"))]
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub family_id: Option<i32>,
    pub facility_id: Option<i32>,
    pub status: Option<MemberStatus>,
    #[validate(length(max = 2000, message = "medical_notes must be at most 2000 characters"))]
    pub medical_notes: Option<String>,
    pub internal_flags: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMemberRequest {
    #[validate(length(min = 1, max = 100, message = "first_name must be 1-100 characters"))]
    #[serde(default, deserialize_with = "clean::optional_trimmed")]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "last_name must be at most 100 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid email"))]
    #[serde(default, deserialize_with = "clean::optional_email")]
    pub email: Option<String>,
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(length(max = 30, message = "phone must be at most 30 characters"))]
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub family_id: Option<i32>,
    pub status: Option<MemberStatus>,
    #[validate(length(max = 2000, message = "medical_notes must be at most 2000 characters"))]
    pub medical_notes: Option<String>,
    pub internal_flags: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEnrollmentRequest {
    #[validate(range(min = 1, message = "program_id is required"))]
    pub program_id: i32,
    pub class_iteration_id: Option<i32>,
    pub status: Option<EnrollmentStatus>,
}

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_event"))]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "title is required (max 200 characters)"))]
    #[serde(deserialize_with = "clean::trimmed")]
    pub title: String,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default, with = "crate::time_format::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "crate::time_format::option")]
    pub end_time: Option<NaiveTime>,
    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 50, message = "event_type must be at most 50 characters"))]
    pub event_type: Option<String>,
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
    #[validate(url(message = "registration_url must be a valid URL"))]
    pub registration_url: Option<String>,
}

fn validate_create_event(event: &CreateEventRequest) -> Result<(), ValidationError> {
    check_date_range(Some(event.event_date), event.end_date)?;
    if event.end_date.is_none() {
        check_time_range(event.start_time, event.end_time)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_event"))]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    #[serde(default, deserialize_with = "clean::optional_trimmed")]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, with = "crate::time_format::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "crate::time_format::option")]
    pub end_time: Option<NaiveTime>,
    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 50, message = "event_type must be at most 50 characters"))]
    pub event_type: Option<String>,
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
    #[validate(url(message = "registration_url must be a valid URL"))]
    pub registration_url: Option<String>,
    pub archived: Option<bool>,
}

fn validate_update_event(event: &UpdateEventRequest) -> Result<(), ValidationError> {
    check_date_range(event.event_date, event.end_date)
}

// =============================================================================
// Catalog: categories, programs, class iterations
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 50, message = "name is required (max 50 characters)"))]
    #[serde(deserialize_with = "clean::trimmed")]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "display_name is required (max 100 characters)"))]
    #[serde(deserialize_with = "clean::trimmed")]
    pub display_name: String,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    #[serde(default, deserialize_with = "clean::optional_trimmed")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "display_name must be 1-100 characters"))]
    #[serde(default, deserialize_with = "clean::optional_trimmed")]
    pub display_name: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub archived: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_program"))]
pub struct CreateProgramRequest {
    #[validate(length(min = 1, max = 100, message = "name is required (max 100 characters)"))]
    #[serde(deserialize_with = "clean::trimmed")]
    pub name: String,
    #[validate(length(max = 150, message = "display_name must be at most 150 characters"))]
    pub display_name: Option<String>,
    pub category_id: Option<i32>,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 50, message = "skill_level must be at most 50 characters"))]
    pub skill_level: Option<String>,
    #[validate(range(min = 0, max = 100, message = "age_min must be between 0 and 100"))]
    pub age_min: Option<i32>,
    #[validate(range(min = 0, max = 100, message = "age_max must be between 0 and 100"))]
    pub age_max: Option<i32>,
    pub is_active: Option<bool>,
}

fn validate_create_program(program: &CreateProgramRequest) -> Result<(), ValidationError> {
    check_age_range(program.age_min, program.age_max)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_program"))]
pub struct UpdateProgramRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    #[serde(default, deserialize_with = "clean::optional_trimmed")]
    pub name: Option<String>,
    #[validate(length(max = 150, message = "display_name must be at most 150 characters"))]
    pub display_name: Option<String>,
    pub category_id: Option<i32>,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 50, message = "skill_level must be at most 50 characters"))]
    pub skill_level: Option<String>,
    #[validate(range(min = 0, max = 100, message = "age_min must be between 0 and 100"))]
    pub age_min: Option<i32>,
    #[validate(range(min = 0, max = 100, message = "age_max must be between 0 and 100"))]
    pub age_max: Option<i32>,
    pub is_active: Option<bool>,
    pub archived: Option<bool>,
}

fn validate_update_program(program: &UpdateProgramRequest) -> Result<(), ValidationError> {
    check_age_range(program.age_min, program.age_max)
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_iteration"))]
pub struct CreateClassIterationRequest {
    #[validate(range(min = 1, message = "iteration_number must be positive"))]
    pub iteration_number: Option<i32>,
    #[validate(custom(function = "validate_days_of_week"))]
    pub days_of_week: Vec<i32>,
    #[serde(with = "crate::time_format")]
    pub start_time: NaiveTime,
    #[serde(with = "crate::time_format")]
    pub end_time: NaiveTime,
    pub duration_type: Option<DurationType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 500, message = "capacity must be between 1 and 500"))]
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

fn validate_create_iteration(iteration: &CreateClassIterationRequest) -> Result<(), ValidationError> {
    check_time_range(Some(iteration.start_time), Some(iteration.end_time))?;
    check_date_range(iteration.start_date, iteration.end_date)?;
    if iteration.duration_type == Some(DurationType::Finite) && iteration.end_date.is_none() {
        return Err(rule("end_date", "end_date is required for a finite class iteration"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_iteration"))]
pub struct UpdateClassIterationRequest {
    #[validate(range(min = 1, message = "iteration_number must be positive"))]
    pub iteration_number: Option<i32>,
    #[validate(custom(function = "validate_days_of_week"))]
    pub days_of_week: Option<Vec<i32>>,
    #[serde(default, with = "crate::time_format::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "crate::time_format::option")]
    pub end_time: Option<NaiveTime>,
    pub duration_type: Option<DurationType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 500, message = "capacity must be between 1 and 500"))]
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

fn validate_update_iteration(iteration: &UpdateClassIterationRequest) -> Result<(), ValidationError> {
    check_time_range(iteration.start_time, iteration.end_time)?;
    check_date_range(iteration.start_date, iteration.end_date)
}

// =============================================================================
// Admin accounts
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(email(message = "email must be a valid email"))]
    #[serde(deserialize_with = "clean::email")]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "name is required (max 100 characters)"))]
    #[serde(deserialize_with = "clean::trimmed")]
    pub name: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub role: Option<AdminRole>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAdminRequest {
    #[validate(email(message = "email must be a valid email"))]
    #[serde(default, deserialize_with = "clean::optional_email")]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    #[serde(default, deserialize_with = "clean::optional_trimmed")]
    pub name: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    pub role: Option<AdminRole>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages(errors: validator::ValidationErrors) -> Vec<String> {
        let mut out: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_registration_rejects_bad_email_and_blank_name() {
        let request: CreateRegistrationRequest = serde_json::from_value(json!({
            "first_name": "",
            "last_name": "Doe",
            "email": "not-an-email"
        }))
        .unwrap();

        let errors = messages(request.validate().unwrap_err());
        assert_eq!(
            errors,
            vec![
                "email must be a valid email".to_string(),
                "first_name is required (max 100 characters)".to_string(),
            ]
        );
    }

    #[test]
    fn test_registration_accepts_minimal_payload() {
        let request: CreateRegistrationRequest = serde_json::from_value(json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane@example.com"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_iteration_rules() {
        let request: CreateClassIterationRequest = serde_json::from_value(json!({
            "days_of_week": [1, 7],
            "start_time": "16:00",
            "end_time": "17:00"
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: CreateClassIterationRequest = serde_json::from_value(json!({
            "days_of_week": [2, 4],
            "start_time": "18:00",
            "end_time": "17:00"
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: CreateClassIterationRequest = serde_json::from_value(json!({
            "days_of_week": [2, 4],
            "start_time": "16:00",
            "end_time": "17:00",
            "duration_type": "finite"
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: CreateClassIterationRequest = serde_json::from_value(json!({
            "days_of_week": [2, 4],
            "start_time": "16:00",
            "end_time": "17:00:00",
            "capacity": 12
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_program_age_range_must_be_ordered() {
        let request: CreateProgramRequest = serde_json::from_value(json!({
            "name": "tumbling",
            "age_min": 12,
            "age_max": 6
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_unknown_registration_status_fails_to_deserialize() {
        let parsed = serde_json::from_value::<UpdateRegistrationRequest>(json!({ "status": "maybe" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_padded_email_is_normalized_before_validation() {
        let request: CreateRegistrationRequest = serde_json::from_value(json!({
            "first_name": " Jane ",
            "last_name": "Doe",
            "email": " Jane@Example.com "
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.email, "jane@example.com");
        assert_eq!(request.first_name, "Jane");

        let login: LoginRequest =
            serde_json::from_value(json!({ "email": "  Owner@Studio.test", "password": "x" })).unwrap();
        assert_eq!(login.email, "owner@studio.test");
        assert!(login.validate().is_ok());
    }

    #[test]
    fn test_whitespace_only_names_are_blank() {
        let request: CreateRegistrationRequest = serde_json::from_value(json!({
            "first_name": "   ",
            "last_name": "\t",
            "email": "jane@example.com"
        }))
        .unwrap();

        let errors = messages(request.validate().unwrap_err());
        assert_eq!(
            errors,
            vec![
                "first_name is required (max 100 characters)".to_string(),
                "last_name is required (max 100 characters)".to_string(),
            ]
        );

        let update: UpdateMemberRequest = serde_json::from_value(json!({ "first_name": "  " })).unwrap();
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_optional_fields_may_be_omitted() {
        let update: UpdateAdminRequest = serde_json::from_value(json!({ "is_active": false })).unwrap();
        assert_eq!(update.email, None);
        assert_eq!(update.name, None);

        let member: CreateMemberRequest =
            serde_json::from_value(json!({ "first_name": "Sam", "email": " SAM@example.com" })).unwrap();
        assert_eq!(member.last_name, "");
        assert_eq!(member.email.as_deref(), Some("sam@example.com"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }
}
