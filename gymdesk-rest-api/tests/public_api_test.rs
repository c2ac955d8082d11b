mod common;

use axum::http::StatusCode;
use chrono::Utc;
use gymdesk_api_types::{AdminRole, NewsletterSubscriber};
use gymdesk_interfaces::AdminCredentials;
use tower::ServiceExt;

use common::*;

fn subscriber(id: i32, is_active: bool) -> NewsletterSubscriber {
    NewsletterSubscriber {
        id,
        email: "fan@example.com".to_string(),
        first_name: None,
        source: Some("website".to_string()),
        is_active,
        subscribed_at: Utc::now(),
        unsubscribed_at: None,
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let response = app(MockRepositories::default()).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "ok");

    let repositories = MockRepositories {
        database_down: true,
        ..Default::default()
    };
    let response = app(repositories).oneshot(get("/health/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["success"], false);
}

#[tokio::test]
async fn test_registration_created_with_numeric_id() {
    let mut repositories = MockRepositories::default();
    repositories
        .registrations
        .expect_find_by_email()
        .withf(|email| email == "jane@example.com")
        .times(1)
        .returning(|_| Ok(None));
    repositories
        .registrations
        .expect_create()
        .withf(|request| request.email == "jane@example.com")
        .times(1)
        .returning(|request| Ok(registration(42, &request.email)));

    let response = app(repositories)
        .oneshot(post_json(
            "/api/registrations",
            r#"{"first_name":"Jane","last_name":"Doe","email":" Jane@Example.com "}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["id"], 42);
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let mut repositories = MockRepositories::default();
    repositories
        .registrations
        .expect_find_by_email()
        .returning(|email| Ok(Some(registration(7, email))));
    repositories.registrations.expect_create().never();

    let response = app(repositories)
        .oneshot(post_json(
            "/api/registrations",
            r#"{"first_name":"Jane","last_name":"Doe","email":"jane@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "A registration with this email already exists");
}

#[tokio::test]
async fn test_invalid_registration_lists_errors() {
    let response = app(MockRepositories::default())
        .oneshot(post_json(
            "/api/registrations",
            r#"{"first_name":"","last_name":"Doe","email":"nope"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["errors"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_whitespace_name_is_rejected() {
    let mut repositories = MockRepositories::default();
    repositories.registrations.expect_create().never();

    let response = app(repositories)
        .oneshot(post_json(
            "/api/registrations",
            r#"{"first_name":"   ","last_name":"Doe","email":"jane@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["errors"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_malformed_json_is_single_error() {
    let response = app(MockRepositories::default())
        .oneshot(post_json("/api/registrations", r#"{"first_name": "#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["errors"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_newsletter_signup_states() {
    let mut repositories = MockRepositories::default();
    repositories
        .newsletter
        .expect_find_by_email()
        .returning(|_| Ok(None));
    repositories
        .newsletter
        .expect_subscribe()
        .times(1)
        .returning(|_| Ok(subscriber(1, true)));
    let response = app(repositories)
        .oneshot(post_json("/api/newsletter", r#"{"email":"fan@example.com"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut repositories = MockRepositories::default();
    repositories
        .newsletter
        .expect_find_by_email()
        .returning(|_| Ok(Some(subscriber(1, true))));
    let response = app(repositories)
        .oneshot(post_json("/api/newsletter", r#"{"email":"fan@example.com"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let mut repositories = MockRepositories::default();
    repositories
        .newsletter
        .expect_find_by_email()
        .returning(|_| Ok(Some(subscriber(1, false))));
    repositories
        .newsletter
        .expect_reactivate()
        .withf(|id| *id == 1)
        .times(1)
        .returning(|id| Ok(Some(subscriber(id, true))));
    let response = app(repositories)
        .oneshot(post_json("/api/newsletter", r#"{"email":"fan@example.com"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["is_active"], true);
}

#[tokio::test]
async fn test_public_events_only_upcoming() {
    let today = Utc::now().date_naive();
    let mut repositories = MockRepositories::default();
    repositories
        .events
        .expect_list()
        .withf(move |filters| !filters.include_archived && filters.from_date == Some(today))
        .times(1)
        .returning(|_| Ok(vec![]));

    let response = app(repositories).oneshot(get("/api/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_login_issues_token() {
    let hash = bcrypt::hash("correct-horse", 4).unwrap();
    let mut repositories = MockRepositories::default();
    repositories
        .admins
        .expect_find_credentials()
        .withf(|email| email == "admin1@studio.test")
        .returning(move |_| {
            Ok(Some(AdminCredentials {
                admin: admin(1, AdminRole::SuperAdmin, true),
                password_hash: hash.clone(),
            }))
        });
    repositories
        .admins
        .expect_record_login()
        .withf(|id| *id == 1)
        .times(1)
        .returning(|_| Ok(()));

    let response = app(repositories)
        .oneshot(post_json(
            "/api/admin/login",
            r#"{"email":"Admin1@studio.test","password":"correct-horse"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["admin"]["role"], "super_admin");

    let token = json["data"]["token"].as_str().unwrap();
    let claims = jwt().verify_token(token).unwrap();
    assert_eq!(claims.sub, "1");
}

#[tokio::test]
async fn test_login_rejects_bad_password_and_inactive_admin() {
    let hash = bcrypt::hash("correct-horse", 4).unwrap();

    let mut repositories = MockRepositories::default();
    let stored = hash.clone();
    repositories.admins.expect_find_credentials().returning(move |_| {
        Ok(Some(AdminCredentials {
            admin: admin(1, AdminRole::Admin, true),
            password_hash: stored.clone(),
        }))
    });
    repositories.admins.expect_record_login().never();
    let response = app(repositories)
        .oneshot(post_json(
            "/api/admin/login",
            r#"{"email":"admin1@studio.test","password":"wrong-horse"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["message"], "Invalid email or password");

    let mut repositories = MockRepositories::default();
    repositories.admins.expect_find_credentials().returning(move |_| {
        Ok(Some(AdminCredentials {
            admin: admin(2, AdminRole::Admin, false),
            password_hash: hash.clone(),
        }))
    });
    repositories.admins.expect_record_login().never();
    let response = app(repositories)
        .oneshot(post_json(
            "/api/admin/login",
            r#"{"email":"admin2@studio.test","password":"correct-horse"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rate_limit_rejects_after_quota() {
    let mut repositories = MockRepositories::default();
    repositories.programs.expect_catalog().returning(|| Ok(vec![]));
    let app = app_with_config(repositories, limited_config(2));

    for remaining in ["1", "0"] {
        let response = app.clone().oneshot(get("/api/programs")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["ratelimit-remaining"], remaining);
    }

    let response = app.clone().oneshot(get("/api/programs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        json_body(response).await["message"],
        "Too many requests, please try again later."
    );

    // Health probes sit outside the limiter
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_enveloped_404() {
    let response = app(MockRepositories::default())
        .oneshot(get("/api/nowhere"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["success"], false);
}
