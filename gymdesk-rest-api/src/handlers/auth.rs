//! Admin login and session endpoints

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use gymdesk_api_types::{normalize_email, Admin, ApiEnvelope, LoginRequest};
use gymdesk_web::{AuthContext, ValidatedJson};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    context::AppContext,
    errors::{RestError, RestResult},
    password::verify_password,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub admin: Admin,
}

/// `POST /api/admin/login`
pub async fn login(
    State(ctx): State<AppContext>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> RestResult<Json<ApiEnvelope<LoginResponse>>> {
    let email = normalize_email(&request.email);
    let admins = ctx.repositories.admin_repository();

    let Some(credentials) = admins.find_credentials(&email).await? else {
        warn!("Login failed: no admin with email {}", email);
        return Err(RestError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(request.password, credentials.password_hash).await? {
        warn!("Login failed: wrong password for {}", email);
        return Err(RestError::unauthorized(INVALID_CREDENTIALS));
    }

    let admin = credentials.admin;
    if !admin.is_active {
        warn!("Login failed: admin account {} is disabled", admin.id);
        return Err(RestError::unauthorized("Account is disabled"));
    }

    admins.record_login(admin.id).await?;
    let issued = ctx.jwt.generate_token(admin.id, &admin.email, admin.role)?;

    info!("Admin {} logged in", admin.id);
    Ok(Json(ApiEnvelope::ok_with_message(
        LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            admin,
        },
        "Login successful",
    )))
}

/// `GET /api/admin/me`
pub async fn me(State(ctx): State<AppContext>, auth: AuthContext) -> RestResult<Json<ApiEnvelope<Admin>>> {
    let admin = ctx
        .repositories
        .admin_repository()
        .find_by_id(auth.admin_id)
        .await?
        .filter(|admin| admin.is_active)
        .ok_or_else(|| RestError::unauthorized("Admin account is no longer active"))?;

    Ok(Json(ApiEnvelope::ok(admin)))
}
