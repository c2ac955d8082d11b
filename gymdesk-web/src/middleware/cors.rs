use axum::http::{header, HeaderName, HeaderValue, Method};
use gymdesk_config::CorsSettings;
use tower_http::cors::{Any, CorsLayer};

use super::request_id::REQUEST_ID_HEADER;
use super::rate_limit::{RATE_LIMIT_LIMIT, RATE_LIMIT_REMAINING, RATE_LIMIT_RESET};

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// CORS layer for the configured site and dashboard origins
pub fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS.to_vec())
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([
            HeaderName::from_static(REQUEST_ID_HEADER),
            RATE_LIMIT_LIMIT,
            RATE_LIMIT_REMAINING,
            RATE_LIMIT_RESET,
        ])
        .max_age(settings.max_age);

    if settings.allows_any_origin() {
        tracing::warn!("CORS configured to allow any origin - use only in development");
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect();
    cors = cors.allow_origin(origins);

    if settings.allow_credentials {
        cors = cors.allow_credentials(true);
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    async fn preflight(settings: &CorsSettings, origin: &str) -> axum::response::Response {
        let app = Router::new()
            .route("/api/events", get(|| async { "ok" }))
            .layer(cors_layer(settings));

        app.oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/events")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_configured_origin_is_allowed() {
        let settings = CorsSettings::default();
        let response = preflight(&settings, "http://localhost:5173").await;
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_unknown_origin_gets_no_allow_header() {
        let settings = CorsSettings::default();
        let response = preflight(&settings, "https://evil.example").await;
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
