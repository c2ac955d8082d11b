//! Studio events

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use gymdesk_api_types::{ApiEnvelope, CreateEventRequest, Event, UpdateEventRequest};
use gymdesk_interfaces::EventFilters;
use gymdesk_web::{PathParams, QueryParams, ValidatedJson};
use tracing::info;

use crate::{
    context::AppContext,
    errors::{RestError, RestResult},
};

/// `GET /api/events`: upcoming, non-archived
pub async fn upcoming_events(State(ctx): State<AppContext>) -> RestResult<Json<ApiEnvelope<Vec<Event>>>> {
    let filters = EventFilters {
        include_archived: false,
        from_date: Some(Utc::now().date_naive()),
    };
    let events = ctx.repositories.event_repository().list(filters).await?;
    Ok(Json(ApiEnvelope::ok(events)))
}

pub async fn list_events(
    State(ctx): State<AppContext>,
    QueryParams(filters): QueryParams<EventFilters>,
) -> RestResult<Json<ApiEnvelope<Vec<Event>>>> {
    let events = ctx.repositories.event_repository().list(filters).await?;
    Ok(Json(ApiEnvelope::ok(events)))
}

pub async fn create_event(
    State(ctx): State<AppContext>,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> RestResult<(StatusCode, Json<ApiEnvelope<Event>>)> {
    let event = ctx.repositories.event_repository().create(request).await?;
    info!("Event {} created", event.id);

    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok_with_message(event, "Event created"))))
}

pub async fn get_event(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<Event>>> {
    let event = ctx
        .repositories
        .event_repository()
        .find_by_id(id)
        .await?
        .ok_or_else(|| RestError::not_found("Event"))?;

    Ok(Json(ApiEnvelope::ok(event)))
}

pub async fn update_event(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
    ValidatedJson(changes): ValidatedJson<UpdateEventRequest>,
) -> RestResult<Json<ApiEnvelope<Event>>> {
    let event = ctx
        .repositories
        .event_repository()
        .update(id, changes)
        .await?
        .ok_or_else(|| RestError::not_found("Event"))?;

    Ok(Json(ApiEnvelope::ok_with_message(event, "Event updated")))
}

pub async fn delete_event(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<()>>> {
    if !ctx.repositories.event_repository().archive(id).await? {
        return Err(RestError::not_found("Event"));
    }

    Ok(Json(ApiEnvelope::message("Event archived")))
}
