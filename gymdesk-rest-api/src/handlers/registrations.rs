//! Registration inquiries: the public form and its admin inbox

use axum::{extract::State, http::StatusCode, Json};
use gymdesk_api_types::{normalize_email, ApiEnvelope, CreateRegistrationRequest, Registration, UpdateRegistrationRequest};
use gymdesk_interfaces::RegistrationFilters;
use gymdesk_web::{PathParams, QueryParams, ValidatedJson};
use serde::Serialize;
use tracing::info;

use crate::{
    context::AppContext,
    errors::{RestError, RestResult},
};

#[derive(Debug, Serialize)]
pub struct CreatedId {
    pub id: i32,
}

/// `POST /api/registrations`
pub async fn create_registration(
    State(ctx): State<AppContext>,
    ValidatedJson(mut request): ValidatedJson<CreateRegistrationRequest>,
) -> RestResult<(StatusCode, Json<ApiEnvelope<CreatedId>>)> {
    request.email = normalize_email(&request.email);
    let repo = ctx.repositories.registration_repository();

    if repo.find_by_email(&request.email).await?.is_some() {
        return Err(RestError::conflict("A registration with this email already exists"));
    }

    let registration = repo.create(request).await?;
    info!("Registration {} received", registration.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok_with_message(
            CreatedId { id: registration.id },
            "Registration submitted successfully",
        )),
    ))
}

/// `GET /api/admin/registrations`
pub async fn list_registrations(
    State(ctx): State<AppContext>,
    QueryParams(filters): QueryParams<RegistrationFilters>,
) -> RestResult<Json<ApiEnvelope<Vec<Registration>>>> {
    let registrations = ctx.repositories.registration_repository().list(filters).await?;
    Ok(Json(ApiEnvelope::ok(registrations)))
}

pub async fn get_registration(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<Registration>>> {
    let registration = ctx
        .repositories
        .registration_repository()
        .find_by_id(id)
        .await?
        .ok_or_else(|| RestError::not_found("Registration"))?;

    Ok(Json(ApiEnvelope::ok(registration)))
}

/// Status and notes are the only editable fields
pub async fn update_registration(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
    ValidatedJson(changes): ValidatedJson<UpdateRegistrationRequest>,
) -> RestResult<Json<ApiEnvelope<Registration>>> {
    let registration = ctx
        .repositories
        .registration_repository()
        .update(id, changes)
        .await?
        .ok_or_else(|| RestError::not_found("Registration"))?;

    Ok(Json(ApiEnvelope::ok_with_message(registration, "Registration updated")))
}

/// Archives; the row stays for reporting
pub async fn delete_registration(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<()>>> {
    if !ctx.repositories.registration_repository().archive(id).await? {
        return Err(RestError::not_found("Registration"));
    }

    info!("Registration {} archived", id);
    Ok(Json(ApiEnvelope::message("Registration archived")))
}
