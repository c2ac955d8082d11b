#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::Utc;
use gymdesk_api_types::{Admin, AdminRole, Registration, RegistrationStatus};
use gymdesk_config::{AuthConfig, RateLimitSettings};
use gymdesk_interfaces::{
    AdminRepository, CategoryRepository, ClassIterationRepository, DatabaseError, EventRepository,
    MemberRepository, MockAdminRepository, MockCategoryRepository, MockClassIterationRepository,
    MockEventRepository, MockMemberRepository, MockNewsletterRepository, MockProgramRepository,
    MockRegistrationRepository, NewsletterRepository, ProgramRepository, RegistrationRepository,
    RepositoryFactory,
};
use gymdesk_rest_api::{create_rest_app, AppConfig, AppContext};
use gymdesk_web::JwtManager;
use std::sync::Arc;

pub const TEST_SECRET: &str = "rest-api-test-secret";

/// Repository factory backed by `mockall` doubles. Any call without an
/// expectation fails the test.
#[derive(Default)]
pub struct MockRepositories {
    pub registrations: MockRegistrationRepository,
    pub newsletter: MockNewsletterRepository,
    pub members: MockMemberRepository,
    pub events: MockEventRepository,
    pub categories: MockCategoryRepository,
    pub programs: MockProgramRepository,
    pub iterations: MockClassIterationRepository,
    pub admins: MockAdminRepository,
    pub database_down: bool,
}

#[async_trait]
impl RepositoryFactory for MockRepositories {
    fn registration_repository(&self) -> &dyn RegistrationRepository {
        &self.registrations
    }

    fn newsletter_repository(&self) -> &dyn NewsletterRepository {
        &self.newsletter
    }

    fn member_repository(&self) -> &dyn MemberRepository {
        &self.members
    }

    fn event_repository(&self) -> &dyn EventRepository {
        &self.events
    }

    fn category_repository(&self) -> &dyn CategoryRepository {
        &self.categories
    }

    fn program_repository(&self) -> &dyn ProgramRepository {
        &self.programs
    }

    fn class_iteration_repository(&self) -> &dyn ClassIterationRepository {
        &self.iterations
    }

    fn admin_repository(&self) -> &dyn AdminRepository {
        &self.admins
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        if self.database_down {
            Err(DatabaseError::Connection {
                message: "connection refused".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

pub fn jwt() -> Arc<JwtManager> {
    Arc::new(JwtManager::new(&AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..Default::default()
    }))
}

pub fn app(repositories: MockRepositories) -> Router {
    app_with_config(repositories, AppConfig::default())
}

pub fn app_with_config(repositories: MockRepositories, config: AppConfig) -> Router {
    let context = AppContext::new(Arc::new(repositories), jwt(), 4);
    create_rest_app(context, config)
}

pub fn limited_config(max_requests: u32) -> AppConfig {
    AppConfig {
        rate_limit: RateLimitSettings {
            max_requests,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn token_for(admin_id: i32, role: AdminRole) -> String {
    jwt()
        .generate_token(admin_id, "owner@studio.test", role)
        .unwrap()
        .token
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn authed(method: &str, uri: &str, token: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn registration(id: i32, email: &str) -> Registration {
    let now = Utc::now();
    Registration {
        id,
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: email.to_string(),
        phone: None,
        athlete_name: Some("Sam Doe".to_string()),
        athlete_age: Some(8),
        interests: Some("tumbling".to_string()),
        message: None,
        status: RegistrationStatus::New,
        notes: None,
        archived: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn admin(id: i32, role: AdminRole, is_active: bool) -> Admin {
    let now = Utc::now();
    Admin {
        id,
        email: format!("admin{}@studio.test", id),
        name: format!("Admin {}", id),
        role,
        is_active,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}
