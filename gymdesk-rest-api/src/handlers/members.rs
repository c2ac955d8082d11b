//! Unified member records and their program enrollments

use axum::{extract::State, http::StatusCode, Json};
use gymdesk_api_types::{
    normalize_email, ApiEnvelope, CreateEnrollmentRequest, CreateMemberRequest, Enrollment, Member,
    UpdateMemberRequest,
};
use gymdesk_interfaces::{MemberChanges, MemberFilters, NewMember};
use gymdesk_web::{PathParams, QueryParams, ValidatedJson};
use tracing::info;

use crate::{
    context::AppContext,
    errors::{RestError, RestResult},
    password::hash_password,
};

async fn hash_optional(password: Option<String>, cost: u32) -> RestResult<Option<String>> {
    match password {
        Some(password) => Ok(Some(hash_password(password, cost).await?)),
        None => Ok(None),
    }
}

pub async fn list_members(
    State(ctx): State<AppContext>,
    QueryParams(filters): QueryParams<MemberFilters>,
) -> RestResult<Json<ApiEnvelope<Vec<Member>>>> {
    let members = ctx.repositories.member_repository().list(filters).await?;
    Ok(Json(ApiEnvelope::ok(members)))
}

pub async fn create_member(
    State(ctx): State<AppContext>,
    ValidatedJson(request): ValidatedJson<CreateMemberRequest>,
) -> RestResult<(StatusCode, Json<ApiEnvelope<Member>>)> {
    let member = NewMember {
        facility_id: request.facility_id,
        family_id: request.family_id,
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        email: request.email.as_deref().map(normalize_email),
        username: request.username,
        phone: request.phone,
        date_of_birth: request.date_of_birth,
        status: request.status.unwrap_or_default(),
        medical_notes: request.medical_notes,
        internal_flags: request.internal_flags,
        password_hash: hash_optional(request.password, ctx.bcrypt_cost).await?,
    };

    let member = ctx.repositories.member_repository().create(member).await?;
    info!("Member {} created", member.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok_with_message(member, "Member created")),
    ))
}

pub async fn get_member(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<Member>>> {
    let member = ctx
        .repositories
        .member_repository()
        .find_by_id(id)
        .await?
        .ok_or_else(|| RestError::not_found("Member"))?;

    Ok(Json(ApiEnvelope::ok(member)))
}

pub async fn update_member(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
    ValidatedJson(request): ValidatedJson<UpdateMemberRequest>,
) -> RestResult<Json<ApiEnvelope<Member>>> {
    let changes = MemberChanges {
        first_name: request.first_name.map(|name| name.trim().to_string()),
        last_name: request.last_name.map(|name| name.trim().to_string()),
        email: request.email.as_deref().map(normalize_email),
        username: request.username,
        phone: request.phone,
        date_of_birth: request.date_of_birth,
        family_id: request.family_id,
        status: request.status,
        medical_notes: request.medical_notes,
        internal_flags: request.internal_flags,
        password_hash: hash_optional(request.password, ctx.bcrypt_cost).await?,
    };

    let member = ctx
        .repositories
        .member_repository()
        .update(id, changes)
        .await?
        .ok_or_else(|| RestError::not_found("Member"))?;

    Ok(Json(ApiEnvelope::ok_with_message(member, "Member updated")))
}

/// Status becomes `archived` and the member is deactivated
pub async fn delete_member(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<()>>> {
    if !ctx.repositories.member_repository().archive(id).await? {
        return Err(RestError::not_found("Member"));
    }

    info!("Member {} archived", id);
    Ok(Json(ApiEnvelope::message("Member archived")))
}

pub async fn list_enrollments(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<Vec<Enrollment>>>> {
    let repo = ctx.repositories.member_repository();
    if repo.find_by_id(id).await?.is_none() {
        return Err(RestError::not_found("Member"));
    }

    Ok(Json(ApiEnvelope::ok(repo.list_enrollments(id).await?)))
}

pub async fn create_enrollment(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
    ValidatedJson(request): ValidatedJson<CreateEnrollmentRequest>,
) -> RestResult<(StatusCode, Json<ApiEnvelope<Enrollment>>)> {
    if ctx
        .repositories
        .program_repository()
        .find_by_id(request.program_id)
        .await?
        .is_none()
    {
        return Err(RestError::not_found("Program"));
    }

    let enrollment = ctx.repositories.member_repository().enroll(id, request).await?;
    info!(
        "Member {} enrolled in program {}",
        enrollment.member_id, enrollment.program_id
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok_with_message(enrollment, "Enrollment created")),
    ))
}

pub async fn delete_enrollment(
    State(ctx): State<AppContext>,
    PathParams((id, enrollment_id)): PathParams<(i32, i32)>,
) -> RestResult<Json<ApiEnvelope<()>>> {
    if !ctx
        .repositories
        .member_repository()
        .remove_enrollment(id, enrollment_id)
        .await?
    {
        return Err(RestError::not_found("Enrollment"));
    }

    Ok(Json(ApiEnvelope::message("Enrollment removed")))
}
