mod common;

use axum::http::StatusCode;
use chrono::Utc;
use gymdesk_api_types::{AdminRole, Member, MemberStatus, RegistrationStatus};
use gymdesk_interfaces::DatabaseError;
use serde_json::json;
use tower::ServiceExt;

use common::*;

fn member(id: i32) -> Member {
    let now = Utc::now();
    Member {
        id,
        facility_id: None,
        family_id: Some(3),
        first_name: "Sam".to_string(),
        last_name: "Doe".to_string(),
        email: None,
        username: None,
        phone: None,
        date_of_birth: None,
        status: MemberStatus::Active,
        is_active: true,
        family_is_active: true,
        medical_notes: None,
        internal_flags: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let response = app(MockRepositories::default())
        .oneshot(get("/api/admin/registrations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["success"], false);

    let response = app(MockRepositories::default())
        .oneshot(authed("GET", "/api/admin/registrations", "not-a-jwt", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_list_passes_filters() {
    let mut repositories = MockRepositories::default();
    repositories
        .registrations
        .expect_list()
        .withf(|filters| filters.status == Some(RegistrationStatus::Contacted) && filters.include_archived)
        .times(1)
        .returning(|_| Ok(vec![registration(1, "jane@example.com")]));

    let token = token_for(1, AdminRole::Admin);
    let response = app(repositories)
        .oneshot(authed(
            "GET",
            "/api/admin/registrations?status=contacted&include_archived=true",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"][0]["id"], 1);
}

#[tokio::test]
async fn test_registration_delete_archives() {
    let mut repositories = MockRepositories::default();
    repositories
        .registrations
        .expect_archive()
        .returning(|id| Ok(id == 5));
    let app = app(repositories);
    let token = token_for(1, AdminRole::Admin);

    let response = app
        .clone()
        .oneshot(authed("DELETE", "/api/admin/registrations/5", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["message"], "Registration archived");

    let response = app
        .oneshot(authed("DELETE", "/api/admin/registrations/6", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Registration not found");
}

#[tokio::test]
async fn test_registration_status_must_be_known() {
    let token = token_for(1, AdminRole::Admin);
    let response = app(MockRepositories::default())
        .oneshot(authed(
            "PUT",
            "/api/admin/registrations/5",
            &token,
            Some(json!({ "status": "maybe" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_member_create_hashes_password() {
    let mut repositories = MockRepositories::default();
    repositories
        .members
        .expect_create()
        .withf(|new_member| {
            new_member.email.as_deref() == Some("sam@example.com")
                && new_member
                    .password_hash
                    .as_deref()
                    .is_some_and(|hash| hash.starts_with("$2") && hash != "supersecret")
        })
        .times(1)
        .returning(|_| Ok(member(10)));

    let token = token_for(1, AdminRole::Admin);
    let response = app(repositories)
        .oneshot(authed(
            "POST",
            "/api/admin/members",
            &token,
            Some(json!({
                "first_name": "Sam",
                "last_name": "Doe",
                "email": "Sam@Example.com",
                "password": "supersecret"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["data"]["id"], 10);
    assert!(json["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_enrollment_iteration_mismatch_is_bad_request() {
    let mut repositories = MockRepositories::default();
    repositories.programs.expect_find_by_id().returning(|id| {
        let now = Utc::now();
        Ok(Some(gymdesk_api_types::Program {
            id,
            category_id: None,
            name: "tumbling".to_string(),
            display_name: None,
            description: None,
            skill_level: None,
            age_min: None,
            age_max: None,
            is_active: true,
            archived: false,
            created_at: now,
            updated_at: now,
        }))
    });
    repositories.members.expect_enroll().returning(|_, _| {
        Err(DatabaseError::Validation {
            message: "class iteration 9 does not belong to program 2".to_string(),
        })
    });

    let token = token_for(1, AdminRole::Admin);
    let response = app(repositories)
        .oneshot(authed(
            "POST",
            "/api/admin/members/10/enrollments",
            &token,
            Some(json!({ "program_id": 2, "class_iteration_id": 9 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_iterations_for_missing_program_is_not_found() {
    let mut repositories = MockRepositories::default();
    repositories.programs.expect_find_by_id().returning(|_| Ok(None));
    repositories.iterations.expect_create().never();

    let token = token_for(1, AdminRole::Admin);
    let response = app(repositories)
        .oneshot(authed(
            "POST",
            "/api/admin/programs/99/iterations",
            &token,
            Some(json!({ "days_of_week": [1, 3], "start_time": "16:00", "end_time": "17:00" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Program not found");
}

#[tokio::test]
async fn test_admin_management_requires_super_admin() {
    let token = token_for(2, AdminRole::Admin);
    let response = app(MockRepositories::default())
        .oneshot(authed("GET", "/api/admin/admins", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cannot_delete_self() {
    let mut repositories = MockRepositories::default();
    repositories.admins.expect_delete().never();

    let token = token_for(1, AdminRole::SuperAdmin);
    let response = app(repositories)
        .oneshot(authed("DELETE", "/api/admin/admins/1", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "You cannot delete your own account");
}

#[tokio::test]
async fn test_cannot_delete_last_active_admin() {
    let mut repositories = MockRepositories::default();
    repositories
        .admins
        .expect_find_by_id()
        .returning(|id| Ok(Some(admin(id, AdminRole::Admin, true))));
    repositories.admins.expect_count_active().returning(|| Ok(1));
    repositories.admins.expect_delete().never();

    let token = token_for(1, AdminRole::SuperAdmin);
    let response = app(repositories)
        .oneshot(authed("DELETE", "/api/admin/admins/2", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Cannot delete the last active admin");
}

#[tokio::test]
async fn test_delete_admin() {
    let mut repositories = MockRepositories::default();
    repositories
        .admins
        .expect_find_by_id()
        .returning(|id| Ok(Some(admin(id, AdminRole::Admin, true))));
    repositories.admins.expect_count_active().returning(|| Ok(2));
    repositories
        .admins
        .expect_delete()
        .withf(|id| *id == 2)
        .times(1)
        .returning(|_| Ok(true));

    let token = token_for(1, AdminRole::SuperAdmin);
    let response = app(repositories)
        .oneshot(authed("DELETE", "/api/admin/admins/2", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unhandled_database_error_is_generic_500() {
    let mut repositories = MockRepositories::default();
    repositories.events.expect_list().returning(|_| {
        Err(DatabaseError::Connection {
            message: "password authentication failed for user gymdesk".to_string(),
        })
    });

    let token = token_for(1, AdminRole::Admin);
    let response = app(repositories)
        .oneshot(authed("GET", "/api/admin/events", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["message"], "Internal server error");
}

#[tokio::test]
async fn test_me_returns_current_admin() {
    let mut repositories = MockRepositories::default();
    repositories
        .admins
        .expect_find_by_id()
        .withf(|id| *id == 4)
        .returning(|id| Ok(Some(admin(id, AdminRole::Admin, true))));

    let token = token_for(4, AdminRole::Admin);
    let response = app(repositories)
        .oneshot(authed("GET", "/api/admin/me", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["email"], "admin4@studio.test");
}
