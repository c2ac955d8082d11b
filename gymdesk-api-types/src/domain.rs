use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Age below which a member needs a guardian on file
pub const ADULT_AGE: u32 = 18;

/// Inquiry submitted through the public registration form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub athlete_name: Option<String>,
    pub athlete_age: Option<i32>,
    pub interests: Option<String>,
    pub message: Option<String>,
    pub status: RegistrationStatus,
    pub notes: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    pub id: i32,
    pub email: String,
    pub first_name: Option<String>,
    pub source: Option<String>,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

/// Row of the unified `member` table. Credentials never leave storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i32,
    pub facility_id: Option<i32>,
    pub family_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub status: MemberStatus,
    pub is_active: bool,
    pub family_is_active: bool,
    pub medical_notes: Option<String>,
    pub internal_flags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// Age in whole years on `today`, if the birth date is known
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let dob = self.date_of_birth?;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }

    pub fn is_minor_on(&self, today: NaiveDate) -> bool {
        self.age_on(today).is_some_and(|age| age < ADULT_AGE)
    }
}

/// A member's enrollment in a program, optionally pinned to one class iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i32,
    pub member_id: i32,
    pub program_id: i32,
    pub class_iteration_id: Option<i32>,
    pub status: EnrollmentStatus,
    pub enrolled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(with = "crate::time_format::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "crate::time_format::option")]
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub image_url: Option<String>,
    pub registration_url: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub skill_level: Option<String>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub is_active: bool,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One scheduled run of a program (days, times and date range)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassIteration {
    pub id: i32,
    pub program_id: i32,
    pub iteration_number: i32,
    /// 0 = Sunday .. 6 = Saturday
    pub days_of_week: Vec<i32>,
    #[serde(with = "crate::time_format")]
    pub start_time: NaiveTime,
    #[serde(with = "crate::time_format")]
    pub end_time: NaiveTime,
    pub duration_type: DurationType,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub capacity: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Program as shown on the public class schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramWithSchedule {
    #[serde(flatten)]
    pub program: Program,
    pub category: Option<Category>,
    pub iterations: Vec<ClassIteration>,
}

/// Back-office account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_born(dob: Option<NaiveDate>) -> Member {
        let now = Utc::now();
        Member {
            id: 1,
            facility_id: None,
            family_id: Some(3),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: None,
            username: None,
            phone: None,
            date_of_birth: dob,
            status: MemberStatus::Active,
            is_active: true,
            family_is_active: true,
            medical_notes: None,
            internal_flags: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_age_counts_birthday_boundary() {
        let member = member_born(NaiveDate::from_ymd_opt(2010, 6, 15));
        let day_before = NaiveDate::from_ymd_opt(2028, 6, 14).unwrap();
        let birthday = NaiveDate::from_ymd_opt(2028, 6, 15).unwrap();

        assert_eq!(member.age_on(day_before), Some(17));
        assert!(member.is_minor_on(day_before));
        assert_eq!(member.age_on(birthday), Some(18));
        assert!(!member.is_minor_on(birthday));
    }

    #[test]
    fn test_unknown_birth_date_is_not_minor() {
        let member = member_born(None);
        assert_eq!(member.age_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), None);
        assert!(!member.is_minor_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
    }

    #[test]
    fn test_class_iteration_times_serialize_as_hh_mm() {
        let now = Utc::now();
        let iteration = ClassIteration {
            id: 4,
            program_id: 2,
            iteration_number: 1,
            days_of_week: vec![1, 3],
            start_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
            duration_type: DurationType::Indefinite,
            start_date: None,
            end_date: None,
            capacity: Some(12),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&iteration).unwrap();
        assert_eq!(value["start_time"], "16:00");
        assert_eq!(value["end_time"], "17:30");
        assert_eq!(value["duration_type"], "indefinite");
    }
}
