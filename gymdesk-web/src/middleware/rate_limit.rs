//! Fixed-window rate limiting keyed by client address

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use gymdesk_config::RateLimitSettings;
use lru::LruCache;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::WebError;

pub const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
pub const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
pub const RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Requests seen from one client in its current window
#[derive(Debug, Clone)]
struct ClientWindow {
    started: Instant,
    count: u32,
}

/// Outcome of one rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets
    pub reset_after: Duration,
}

/// Rate limiter implementation
pub struct RateLimiter {
    settings: RateLimitSettings,
    trust_proxy: bool,
    clients: Mutex<LruCache<String, ClientWindow>>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings, trust_proxy: bool) -> Self {
        let capacity = NonZeroUsize::new(settings.max_clients).unwrap_or(NonZeroUsize::MIN);
        Self {
            settings,
            trust_proxy,
            clients: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub async fn check(&self, client_id: &str) -> RateDecision {
        self.check_at(client_id, Instant::now()).await
    }

    async fn check_at(&self, client_id: &str, now: Instant) -> RateDecision {
        let limit = self.settings.max_requests;
        let window = self.settings.window;
        let mut clients = self.clients.lock().await;

        let entry = clients.get_or_insert_mut(client_id.to_string(), || ClientWindow {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(entry.started) >= window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count = entry.count.saturating_add(1);

        RateDecision {
            allowed: entry.count <= limit,
            limit,
            remaining: limit.saturating_sub(entry.count),
            reset_after: window.saturating_sub(now.saturating_duration_since(entry.started)),
        }
    }

    /// `ip:<addr>`, taken from `X-Forwarded-For` when behind a trusted proxy
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        if self.trust_proxy {
            let forwarded = headers
                .get(FORWARDED_FOR)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());
            if let Some(addr) = forwarded {
                return format!("ip:{}", addr);
            }
        }

        match peer {
            Some(addr) => format!("ip:{}", addr.ip()),
            None => "unknown".to_string(),
        }
    }
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    headers.insert(RATE_LIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(
        RATE_LIMIT_RESET,
        HeaderValue::from(decision.reset_after.as_secs()),
    );
}

/// Rate limiting middleware, attached with `from_fn_with_state`
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if !limiter.is_enabled() {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_id = limiter.client_key(request.headers(), peer);
    let decision = limiter.check(&client_id).await;

    if !decision.allowed {
        warn!(
            "Rate limit exceeded for client: {}, retry after: {:?}",
            client_id, decision.reset_after
        );
        let mut response = WebError::RateLimit.into_response();
        apply_headers(response.headers_mut(), &decision);
        return response;
    }

    debug!("Rate limit check passed for client: {}", client_id);
    let mut response = next.run(request).await;
    apply_headers(response.headers_mut(), &decision);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
    use std::net::{IpAddr, Ipv4Addr};
    use tower::ServiceExt;

    fn settings(max_requests: u32) -> RateLimitSettings {
        RateLimitSettings {
            enabled: true,
            max_requests,
            window: Duration::from_secs(60),
            max_clients: 16,
        }
    }

    fn app(limiter: Arc<RateLimiter>) -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(from_fn_with_state(limiter, rate_limit_middleware))
    }

    fn request_from(ip: [u8; 4]) -> axum::http::Request<Body> {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::from(ip)), 50000);
        axum::http::Request::builder()
            .uri("/ping")
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_window_allows_up_to_limit() {
        let limiter = RateLimiter::new(settings(3), false);
        let now = Instant::now();

        for expected_remaining in [2, 1, 0] {
            let decision = limiter.check_at("ip:10.0.0.1", now).await;
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
        }
        assert!(!limiter.check_at("ip:10.0.0.1", now).await.allowed);
        assert!(limiter.check_at("ip:10.0.0.2", now).await.allowed);
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(settings(1), false);
        let start = Instant::now();

        assert!(limiter.check_at("ip:10.0.0.1", start).await.allowed);
        assert!(!limiter.check_at("ip:10.0.0.1", start + Duration::from_secs(30)).await.allowed);

        let decision = limiter.check_at("ip:10.0.0.1", start + Duration::from_secs(61)).await;
        assert!(decision.allowed);
        assert_eq!(decision.reset_after, Duration::from_secs(60));
    }

    #[test]
    fn test_forwarded_for_only_when_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        let peer = Some(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 1234));

        let direct = RateLimiter::new(settings(1), false);
        assert_eq!(direct.client_key(&headers, peer), "ip:127.0.0.1");

        let proxied = RateLimiter::new(settings(1), true);
        assert_eq!(proxied.client_key(&headers, peer), "ip:203.0.113.9");
        assert_eq!(proxied.client_key(&HeaderMap::new(), None), "unknown");
    }

    #[tokio::test]
    async fn test_middleware_rejects_with_envelope() {
        let limiter = Arc::new(RateLimiter::new(settings(1), false));

        let first = app(limiter.clone()).oneshot(request_from([10, 0, 0, 1])).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()[RATE_LIMIT_REMAINING], "0");

        let second = app(limiter.clone()).oneshot(request_from([10, 0, 0, 1])).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = axum::body::to_bytes(second.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], crate::errors::RATE_LIMIT_MESSAGE);

        let other = app(limiter).oneshot(request_from([10, 0, 0, 2])).await.unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }
}
