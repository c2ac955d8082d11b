use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use gymdesk_api_types::{normalize_email, NewsletterSignupRequest, NewsletterSubscriber};
use gymdesk_interfaces::{DatabaseError, NewsletterRepository};

use crate::seaorm::{
    connection::DatabaseConnection,
    entities::{newsletter_subscribers, NewsletterSubscribers},
    errors::db_err,
};

#[derive(Clone)]
pub struct SeaOrmNewsletterRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmNewsletterRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: newsletter_subscribers::Model) -> NewsletterSubscriber {
        NewsletterSubscriber {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            source: model.source,
            is_active: model.is_active,
            subscribed_at: model.subscribed_at,
            unsubscribed_at: model.unsubscribed_at,
        }
    }
}

#[async_trait]
impl NewsletterRepository for SeaOrmNewsletterRepository {
    async fn subscribe(&self, request: NewsletterSignupRequest) -> Result<NewsletterSubscriber, DatabaseError> {
        let active_model = newsletter_subscribers::ActiveModel {
            email: Set(normalize_email(&request.email)),
            first_name: Set(request.first_name),
            source: Set(request.source.or_else(|| Some("website".to_string()))),
            is_active: Set(true),
            subscribed_at: Set(Utc::now()),
            unsubscribed_at: Set(None),
            ..Default::default()
        };

        let result = active_model
            .insert(self.db.get_connection())
            .await
            .map_err(db_err("create newsletter subscription"))?;

        Ok(Self::to_domain(result))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<NewsletterSubscriber>, DatabaseError> {
        let row = NewsletterSubscribers::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(newsletter_subscribers::Column::Email)))
                    .eq(normalize_email(email)),
            )
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find newsletter subscriber by email"))?;

        Ok(row.map(Self::to_domain))
    }

    async fn reactivate(&self, id: i32) -> Result<Option<NewsletterSubscriber>, DatabaseError> {
        let Some(existing) = NewsletterSubscribers::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find newsletter subscriber"))?
        else {
            return Ok(None);
        };

        let mut active_model: newsletter_subscribers::ActiveModel = existing.into();
        active_model.is_active = Set(true);
        active_model.subscribed_at = Set(Utc::now());
        active_model.unsubscribed_at = Set(None);

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(db_err("reactivate newsletter subscriber"))?;

        Ok(Some(Self::to_domain(updated)))
    }

    async fn list(&self, active: Option<bool>) -> Result<Vec<NewsletterSubscriber>, DatabaseError> {
        let mut query = NewsletterSubscribers::find();
        if let Some(active) = active {
            query = query.filter(newsletter_subscribers::Column::IsActive.eq(active));
        }

        let rows = query
            .order_by_desc(newsletter_subscribers::Column::SubscribedAt)
            .all(self.db.get_connection())
            .await
            .map_err(db_err("list newsletter subscribers"))?;

        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    async fn unsubscribe(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = NewsletterSubscribers::update_many()
            .col_expr(newsletter_subscribers::Column::IsActive, Expr::value(false))
            .col_expr(newsletter_subscribers::Column::UnsubscribedAt, Expr::value(Utc::now()))
            .filter(newsletter_subscribers::Column::Id.eq(id))
            .exec(self.db.get_connection())
            .await
            .map_err(db_err("unsubscribe newsletter subscriber"))?;

        Ok(result.rows_affected > 0)
    }
}
