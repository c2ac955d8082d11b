//! Program catalog: categories, programs and their class iterations

use axum::{extract::State, http::StatusCode, Json};
use gymdesk_api_types::{
    ApiEnvelope, Category, ClassIteration, CreateCategoryRequest, CreateClassIterationRequest,
    CreateProgramRequest, Program, ProgramWithSchedule, UpdateCategoryRequest,
    UpdateClassIterationRequest, UpdateProgramRequest,
};
use gymdesk_interfaces::ProgramFilters;
use gymdesk_web::{PathParams, QueryParams, ValidatedJson};
use serde::Deserialize;
use tracing::info;

use crate::{
    context::AppContext,
    errors::{RestError, RestResult},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArchivedQuery {
    pub include_archived: bool,
}

/// `GET /api/programs`: the public class schedule
pub async fn program_catalog(
    State(ctx): State<AppContext>,
) -> RestResult<Json<ApiEnvelope<Vec<ProgramWithSchedule>>>> {
    let programs = ctx.repositories.program_repository().catalog().await?;
    Ok(Json(ApiEnvelope::ok(programs)))
}

// =============================================================================
// Categories
// =============================================================================

pub async fn list_categories(
    State(ctx): State<AppContext>,
    QueryParams(query): QueryParams<ArchivedQuery>,
) -> RestResult<Json<ApiEnvelope<Vec<Category>>>> {
    let categories = ctx
        .repositories
        .category_repository()
        .list(query.include_archived)
        .await?;
    Ok(Json(ApiEnvelope::ok(categories)))
}

pub async fn create_category(
    State(ctx): State<AppContext>,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> RestResult<(StatusCode, Json<ApiEnvelope<Category>>)> {
    let category = ctx.repositories.category_repository().create(request).await?;
    info!("Category {} created", category.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok_with_message(category, "Category created")),
    ))
}

pub async fn update_category(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
    ValidatedJson(changes): ValidatedJson<UpdateCategoryRequest>,
) -> RestResult<Json<ApiEnvelope<Category>>> {
    let category = ctx
        .repositories
        .category_repository()
        .update(id, changes)
        .await?
        .ok_or_else(|| RestError::not_found("Category"))?;

    Ok(Json(ApiEnvelope::ok_with_message(category, "Category updated")))
}

pub async fn delete_category(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<()>>> {
    if !ctx.repositories.category_repository().archive(id).await? {
        return Err(RestError::not_found("Category"));
    }

    Ok(Json(ApiEnvelope::message("Category archived")))
}

// =============================================================================
// Programs
// =============================================================================

async fn ensure_category(ctx: &AppContext, category_id: Option<i32>) -> RestResult<()> {
    if let Some(id) = category_id {
        if ctx.repositories.category_repository().find_by_id(id).await?.is_none() {
            return Err(RestError::bad_request(format!("Category {} does not exist", id)));
        }
    }
    Ok(())
}

async fn ensure_program(ctx: &AppContext, program_id: i32) -> RestResult<Program> {
    ctx.repositories
        .program_repository()
        .find_by_id(program_id)
        .await?
        .ok_or_else(|| RestError::not_found("Program"))
}

pub async fn list_programs(
    State(ctx): State<AppContext>,
    QueryParams(filters): QueryParams<ProgramFilters>,
) -> RestResult<Json<ApiEnvelope<Vec<Program>>>> {
    let programs = ctx.repositories.program_repository().list(filters).await?;
    Ok(Json(ApiEnvelope::ok(programs)))
}

pub async fn create_program(
    State(ctx): State<AppContext>,
    ValidatedJson(request): ValidatedJson<CreateProgramRequest>,
) -> RestResult<(StatusCode, Json<ApiEnvelope<Program>>)> {
    ensure_category(&ctx, request.category_id).await?;

    let program = ctx.repositories.program_repository().create(request).await?;
    info!("Program {} created", program.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok_with_message(program, "Program created")),
    ))
}

pub async fn get_program(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<Program>>> {
    Ok(Json(ApiEnvelope::ok(ensure_program(&ctx, id).await?)))
}

pub async fn update_program(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
    ValidatedJson(changes): ValidatedJson<UpdateProgramRequest>,
) -> RestResult<Json<ApiEnvelope<Program>>> {
    ensure_category(&ctx, changes.category_id).await?;

    let program = ctx
        .repositories
        .program_repository()
        .update(id, changes)
        .await?
        .ok_or_else(|| RestError::not_found("Program"))?;

    Ok(Json(ApiEnvelope::ok_with_message(program, "Program updated")))
}

pub async fn delete_program(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<()>>> {
    if !ctx.repositories.program_repository().archive(id).await? {
        return Err(RestError::not_found("Program"));
    }

    Ok(Json(ApiEnvelope::message("Program archived")))
}

// =============================================================================
// Class iterations
// =============================================================================

pub async fn list_iterations(
    State(ctx): State<AppContext>,
    PathParams(program_id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<Vec<ClassIteration>>>> {
    ensure_program(&ctx, program_id).await?;

    let iterations = ctx
        .repositories
        .class_iteration_repository()
        .list_for_program(program_id)
        .await?;
    Ok(Json(ApiEnvelope::ok(iterations)))
}

pub async fn create_iteration(
    State(ctx): State<AppContext>,
    PathParams(program_id): PathParams<i32>,
    ValidatedJson(request): ValidatedJson<CreateClassIterationRequest>,
) -> RestResult<(StatusCode, Json<ApiEnvelope<ClassIteration>>)> {
    ensure_program(&ctx, program_id).await?;

    let iteration = ctx
        .repositories
        .class_iteration_repository()
        .create(program_id, request)
        .await?;
    info!("Class iteration {} created for program {}", iteration.id, program_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok_with_message(iteration, "Class iteration created")),
    ))
}

pub async fn update_iteration(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
    ValidatedJson(changes): ValidatedJson<UpdateClassIterationRequest>,
) -> RestResult<Json<ApiEnvelope<ClassIteration>>> {
    let iteration = ctx
        .repositories
        .class_iteration_repository()
        .update(id, changes)
        .await?
        .ok_or_else(|| RestError::not_found("Class iteration"))?;

    Ok(Json(ApiEnvelope::ok_with_message(iteration, "Class iteration updated")))
}

/// Hard delete
pub async fn delete_iteration(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<()>>> {
    if !ctx.repositories.class_iteration_repository().delete(id).await? {
        return Err(RestError::not_found("Class iteration"));
    }

    Ok(Json(ApiEnvelope::message("Class iteration deleted")))
}
