//! Router setup

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use gymdesk_config::{RateLimitSettings, ServerConfig};
use gymdesk_web::{handle_not_found, rate_limit_middleware, require_admin, RateLimiter};
use std::sync::Arc;

use crate::{context::AppContext, handlers};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API path prefix
    pub api_prefix: String,
    /// Take the rate-limit client key from `X-Forwarded-For`
    pub trust_proxy: bool,
    pub rate_limit: RateLimitSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            trust_proxy: false,
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            api_prefix: server.api_prefix.clone(),
            trust_proxy: server.trust_proxy,
            rate_limit: server.rate_limit.clone(),
        }
    }
}

/// Create the complete REST API application
///
/// Health probes sit outside the prefix and skip the rate limiter. Everything
/// under `{prefix}/admin` except `login` needs an admin bearer token.
pub fn create_rest_app(context: AppContext, config: AppConfig) -> Router {
    let limiter = Arc::new(RateLimiter::new(config.rate_limit.clone(), config.trust_proxy));

    let api = create_public_router()
        .nest("/admin", create_admin_router(&context))
        .layer(from_fn_with_state(limiter, rate_limit_middleware));

    let prefix = config.api_prefix.trim_end_matches('/');
    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    let app = if prefix.is_empty() {
        app.merge(api)
    } else {
        app.nest(prefix, api)
    };

    app.fallback(handle_not_found).with_state(context)
}

fn create_public_router() -> Router<AppContext> {
    use handlers::{auth, catalog, events, newsletter, registrations};

    Router::new()
        .route("/registrations", post(registrations::create_registration))
        .route("/newsletter", post(newsletter::subscribe))
        .route("/events", get(events::upcoming_events))
        .route("/programs", get(catalog::program_catalog))
        .route("/admin/login", post(auth::login))
}

fn create_admin_router(context: &AppContext) -> Router<AppContext> {
    use handlers::{admins, auth, catalog, events, members, newsletter, registrations};

    Router::new()
        .route("/me", get(auth::me))
        // Registration inbox
        .route("/registrations", get(registrations::list_registrations))
        .route(
            "/registrations/{id}",
            get(registrations::get_registration)
                .put(registrations::update_registration)
                .delete(registrations::delete_registration),
        )
        // Newsletter
        .route("/newsletter", get(newsletter::list_subscribers))
        .route("/newsletter/{id}", delete(newsletter::unsubscribe))
        // Members
        .route("/members", get(members::list_members).post(members::create_member))
        .route(
            "/members/{id}",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .route(
            "/members/{id}/enrollments",
            get(members::list_enrollments).post(members::create_enrollment),
        )
        .route(
            "/members/{id}/enrollments/{enrollment_id}",
            delete(members::delete_enrollment),
        )
        // Events
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Catalog
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/categories/{id}",
            put(catalog::update_category).delete(catalog::delete_category),
        )
        .route("/programs", get(catalog::list_programs).post(catalog::create_program))
        .route(
            "/programs/{id}",
            get(catalog::get_program)
                .put(catalog::update_program)
                .delete(catalog::delete_program),
        )
        .route(
            "/programs/{id}/iterations",
            get(catalog::list_iterations).post(catalog::create_iteration),
        )
        .route(
            "/iterations/{id}",
            put(catalog::update_iteration).delete(catalog::delete_iteration),
        )
        // Admin accounts
        .route("/admins", get(admins::list_admins).post(admins::create_admin))
        .route(
            "/admins/{id}",
            put(admins::update_admin).delete(admins::delete_admin),
        )
        .route_layer(from_fn_with_state(context.jwt.clone(), require_admin))
}
