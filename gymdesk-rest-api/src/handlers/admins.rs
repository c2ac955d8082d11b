//! Admin account management, restricted to super admins

use axum::{extract::State, http::StatusCode, Json};
use gymdesk_api_types::{normalize_email, Admin, ApiEnvelope, CreateAdminRequest, UpdateAdminRequest};
use gymdesk_interfaces::{AdminChanges, NewAdmin};
use gymdesk_web::{AuthContext, PathParams, ValidatedJson};
use tracing::{info, warn};

use crate::{
    context::AppContext,
    errors::{RestError, RestResult},
    password::hash_password,
};

pub async fn list_admins(
    State(ctx): State<AppContext>,
    auth: AuthContext,
) -> RestResult<Json<ApiEnvelope<Vec<Admin>>>> {
    auth.require_super_admin()?;

    let admins = ctx.repositories.admin_repository().list().await?;
    Ok(Json(ApiEnvelope::ok(admins)))
}

pub async fn create_admin(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    ValidatedJson(request): ValidatedJson<CreateAdminRequest>,
) -> RestResult<(StatusCode, Json<ApiEnvelope<Admin>>)> {
    auth.require_super_admin()?;

    let email = normalize_email(&request.email);
    let repo = ctx.repositories.admin_repository();
    if repo.find_credentials(&email).await?.is_some() {
        return Err(RestError::conflict("An admin with this email already exists"));
    }

    let admin = repo
        .create(NewAdmin {
            email,
            name: request.name.trim().to_string(),
            password_hash: hash_password(request.password, ctx.bcrypt_cost).await?,
            role: request.role.unwrap_or_default(),
        })
        .await?;
    info!("Admin {} created by {}", admin.id, auth.admin_id);

    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok_with_message(admin, "Admin created"))))
}

pub async fn update_admin(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    PathParams(id): PathParams<i32>,
    ValidatedJson(request): ValidatedJson<UpdateAdminRequest>,
) -> RestResult<Json<ApiEnvelope<Admin>>> {
    auth.require_super_admin()?;

    let repo = ctx.repositories.admin_repository();
    let target = repo.find_by_id(id).await?.ok_or_else(|| RestError::not_found("Admin"))?;

    if request.is_active == Some(false) && target.is_active {
        if id == auth.admin_id {
            return Err(RestError::bad_request("You cannot deactivate your own account"));
        }
        if repo.count_active().await? <= 1 {
            return Err(RestError::bad_request("Cannot deactivate the last active admin"));
        }
    }

    let password_hash = match request.password {
        Some(password) => Some(hash_password(password, ctx.bcrypt_cost).await?),
        None => None,
    };
    let changes = AdminChanges {
        email: request.email.as_deref().map(normalize_email),
        name: request.name.map(|name| name.trim().to_string()),
        password_hash,
        role: request.role,
        is_active: request.is_active,
    };

    let admin = repo
        .update(id, changes)
        .await?
        .ok_or_else(|| RestError::not_found("Admin"))?;

    Ok(Json(ApiEnvelope::ok_with_message(admin, "Admin updated")))
}

/// Refuses to remove the caller's own account or the last active admin
pub async fn delete_admin(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<()>>> {
    auth.require_super_admin()?;

    if id == auth.admin_id {
        return Err(RestError::bad_request("You cannot delete your own account"));
    }

    let repo = ctx.repositories.admin_repository();
    let target = repo.find_by_id(id).await?.ok_or_else(|| RestError::not_found("Admin"))?;
    if target.is_active && repo.count_active().await? <= 1 {
        warn!("Refused to delete admin {}: last active admin", id);
        return Err(RestError::bad_request("Cannot delete the last active admin"));
    }

    if !repo.delete(id).await? {
        return Err(RestError::not_found("Admin"));
    }

    info!("Admin {} deleted by {}", id, auth.admin_id);
    Ok(Json(ApiEnvelope::message("Admin deleted")))
}
