mod common;

use chrono::NaiveTime;
use common::TestDb;
use gymdesk_api_types::{
    CreateClassIterationRequest, CreateEnrollmentRequest, CreateProgramRequest, CreateRegistrationRequest,
    EnrollmentStatus, MemberStatus, RegistrationStatus,
};
use gymdesk_interfaces::{
    ClassIterationRepository, DatabaseError, MemberRepository, NewMember, ProgramRepository, RegistrationFilters,
    RegistrationRepository,
};
use gymdesk_storage::seaorm::repositories::{
    SeaOrmClassIterationRepository, SeaOrmMemberRepository, SeaOrmProgramRepository, SeaOrmRegistrationRepository,
};

fn registration(email: &str) -> CreateRegistrationRequest {
    CreateRegistrationRequest {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        phone: None,
        athlete_name: Some("Byron".to_string()),
        athlete_age: Some(9),
        interests: None,
        message: None,
    }
}

fn program(name: &str) -> CreateProgramRequest {
    CreateProgramRequest {
        name: name.to_string(),
        display_name: None,
        category_id: None,
        description: None,
        skill_level: None,
        age_min: None,
        age_max: None,
        is_active: None,
    }
}

fn iteration() -> CreateClassIterationRequest {
    CreateClassIterationRequest {
        iteration_number: None,
        days_of_week: vec![1, 3],
        start_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        duration_type: None,
        start_date: None,
        end_date: None,
        capacity: Some(12),
        is_active: None,
    }
}

#[tokio::test]
async fn test_schema_migration_is_idempotent() {
    let Some(test_db) = TestDb::create().await else {
        return;
    };

    test_db.db.migrate().await.unwrap();
    test_db.db.migrate().await.unwrap();

    let status = test_db.db.migration_status().await.unwrap();
    assert!(!status.is_empty());
    assert!(status.iter().all(|m| m.applied));

    test_db.drop_schema().await;
}

#[tokio::test]
async fn test_registration_duplicate_and_soft_delete() {
    let Some(test_db) = TestDb::create().await else {
        return;
    };
    test_db.db.migrate().await.unwrap();
    let repo = SeaOrmRegistrationRepository::new(test_db.db.clone());

    let created = repo.create(registration("ada@example.com")).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.status, RegistrationStatus::New);

    let duplicate = repo.create(registration("ADA@example.com")).await.unwrap_err();
    assert!(matches!(duplicate, DatabaseError::Constraint { .. }));

    assert!(repo.archive(created.id).await.unwrap());
    let listed = repo.list(RegistrationFilters::default()).await.unwrap();
    assert!(listed.iter().all(|r| r.id != created.id));

    let archived = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert!(archived.archived);

    assert!(!repo.archive(9999).await.unwrap());

    test_db.drop_schema().await;
}

#[tokio::test]
async fn test_enrollment_requires_matching_iteration() {
    let Some(test_db) = TestDb::create().await else {
        return;
    };
    test_db.db.migrate().await.unwrap();

    let programs = SeaOrmProgramRepository::new(test_db.db.clone());
    let iterations = SeaOrmClassIterationRepository::new(test_db.db.clone());
    let members = SeaOrmMemberRepository::new(test_db.db.clone());

    let tumbling = programs.create(program("Tumbling")).await.unwrap();
    let ninja = programs.create(program("Ninja")).await.unwrap();
    let ninja_class = iterations.create(ninja.id, iteration()).await.unwrap();
    assert_eq!(ninja_class.iteration_number, 1);

    let member = members
        .create(NewMember {
            first_name: "Kid".to_string(),
            last_name: "Parent".to_string(),
            status: MemberStatus::Active,
            ..Default::default()
        })
        .await
        .unwrap();

    let mismatched = members
        .enroll(
            member.id,
            CreateEnrollmentRequest {
                program_id: tumbling.id,
                class_iteration_id: Some(ninja_class.id),
                status: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(mismatched, DatabaseError::Validation { .. }));

    let enrollment = members
        .enroll(
            member.id,
            CreateEnrollmentRequest {
                program_id: ninja.id,
                class_iteration_id: Some(ninja_class.id),
                status: Some(EnrollmentStatus::Waitlisted),
            },
        )
        .await
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Waitlisted);
    assert_eq!(members.list_enrollments(member.id).await.unwrap().len(), 1);

    test_db.drop_schema().await;
}
