//! Newsletter signups

use axum::{extract::State, http::StatusCode, Json};
use gymdesk_api_types::{normalize_email, ApiEnvelope, NewsletterSignupRequest, NewsletterSubscriber};
use gymdesk_web::{PathParams, QueryParams, ValidatedJson};
use serde::Deserialize;
use tracing::info;

use crate::{
    context::AppContext,
    errors::{RestError, RestResult},
};

#[derive(Debug, Default, Deserialize)]
pub struct SubscriberQuery {
    pub active: Option<bool>,
}

/// `POST /api/newsletter`
///
/// New addresses answer 201, a previously unsubscribed address is reactivated
/// with 200, and an active subscription is a 409.
pub async fn subscribe(
    State(ctx): State<AppContext>,
    ValidatedJson(mut request): ValidatedJson<NewsletterSignupRequest>,
) -> RestResult<(StatusCode, Json<ApiEnvelope<NewsletterSubscriber>>)> {
    request.email = normalize_email(&request.email);
    let repo = ctx.repositories.newsletter_repository();

    match repo.find_by_email(&request.email).await? {
        Some(existing) if existing.is_active => Err(RestError::conflict("This email is already subscribed")),
        Some(existing) => {
            let subscriber = repo
                .reactivate(existing.id)
                .await?
                .ok_or_else(|| RestError::not_found("Subscriber"))?;
            info!("Newsletter subscriber {} reactivated", subscriber.id);
            Ok((
                StatusCode::OK,
                Json(ApiEnvelope::ok_with_message(subscriber, "Welcome back! Your subscription is active again")),
            ))
        }
        None => {
            let subscriber = repo.subscribe(request).await?;
            info!("Newsletter subscriber {} added", subscriber.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiEnvelope::ok_with_message(subscriber, "Subscribed successfully")),
            ))
        }
    }
}

/// `GET /api/admin/newsletter`
pub async fn list_subscribers(
    State(ctx): State<AppContext>,
    QueryParams(query): QueryParams<SubscriberQuery>,
) -> RestResult<Json<ApiEnvelope<Vec<NewsletterSubscriber>>>> {
    let subscribers = ctx.repositories.newsletter_repository().list(query.active).await?;
    Ok(Json(ApiEnvelope::ok(subscribers)))
}

pub async fn unsubscribe(
    State(ctx): State<AppContext>,
    PathParams(id): PathParams<i32>,
) -> RestResult<Json<ApiEnvelope<()>>> {
    if !ctx.repositories.newsletter_repository().unsubscribe(id).await? {
        return Err(RestError::not_found("Subscriber"));
    }

    Ok(Json(ApiEnvelope::message("Subscriber unsubscribed")))
}
