//! Health check endpoints

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use gymdesk_api_types::ApiEnvelope;
use serde::Serialize;
use tracing::{debug, error};

use crate::{
    context::AppContext,
    errors::{RestError, RestResult},
};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
        }
    }
}

/// Liveness: answers as long as the process serves requests
pub async fn health_check() -> Json<ApiEnvelope<HealthReport>> {
    debug!("Health check requested");
    Json(ApiEnvelope::ok(HealthReport::new("ok")))
}

/// Readiness: 503 until the database answers a ping
pub async fn readiness_check(State(ctx): State<AppContext>) -> RestResult<Json<ApiEnvelope<HealthReport>>> {
    if let Err(e) = ctx.repositories.health_check().await {
        error!("Readiness check failed: {}", e);
        return Err(RestError::ServiceUnavailable(e.to_string()));
    }

    Ok(Json(ApiEnvelope::ok(HealthReport::new("ready"))))
}
