use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

use gymdesk_api_types::{CreateEventRequest, Event, UpdateEventRequest};
use gymdesk_interfaces::{DatabaseError, EventFilters, EventRepository};

use crate::seaorm::{
    connection::DatabaseConnection,
    entities::{events, Events},
    errors::db_err,
};

#[derive(Clone)]
pub struct SeaOrmEventRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: events::Model) -> Event {
        Event {
            id: model.id,
            title: model.title,
            description: model.description,
            event_date: model.event_date,
            end_date: model.end_date,
            start_time: model.start_time,
            end_time: model.end_time,
            location: model.location,
            event_type: model.event_type,
            image_url: model.image_url,
            registration_url: model.registration_url,
            archived: model.archived,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl EventRepository for SeaOrmEventRepository {
    async fn create(&self, request: CreateEventRequest) -> Result<Event, DatabaseError> {
        let now = Utc::now();
        let active_model = events::ActiveModel {
            title: Set(request.title),
            description: Set(request.description),
            event_date: Set(request.event_date),
            end_date: Set(request.end_date),
            start_time: Set(request.start_time),
            end_time: Set(request.end_time),
            location: Set(request.location),
            event_type: Set(request.event_type),
            image_url: Set(request.image_url),
            registration_url: Set(request.registration_url),
            archived: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = active_model
            .insert(self.db.get_connection())
            .await
            .map_err(db_err("create event"))?;

        Ok(Self::to_domain(result))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, DatabaseError> {
        let row = Events::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find event by id"))?;

        Ok(row.map(Self::to_domain))
    }

    async fn list(&self, filters: EventFilters) -> Result<Vec<Event>, DatabaseError> {
        let mut query = Events::find();

        if !filters.include_archived {
            query = query.filter(events::Column::Archived.eq(false));
        }

        // Multi-day events stay listed until their last day
        if let Some(from) = filters.from_date {
            query = query.filter(
                Condition::any()
                    .add(events::Column::EventDate.gte(from))
                    .add(events::Column::EndDate.gte(from)),
            );
        }

        let rows = query
            .order_by_asc(events::Column::EventDate)
            .order_by_asc(events::Column::StartTime)
            .order_by_asc(events::Column::Id)
            .all(self.db.get_connection())
            .await
            .map_err(db_err("list events"))?;

        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    async fn update(&self, id: i32, changes: UpdateEventRequest) -> Result<Option<Event>, DatabaseError> {
        let Some(existing) = Events::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find event for update"))?
        else {
            return Ok(None);
        };

        let mut active_model: events::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active_model.title = Set(title);
        }
        if let Some(description) = changes.description {
            active_model.description = Set(Some(description));
        }
        if let Some(event_date) = changes.event_date {
            active_model.event_date = Set(event_date);
        }
        if let Some(end_date) = changes.end_date {
            active_model.end_date = Set(Some(end_date));
        }
        if let Some(start_time) = changes.start_time {
            active_model.start_time = Set(Some(start_time));
        }
        if let Some(end_time) = changes.end_time {
            active_model.end_time = Set(Some(end_time));
        }
        if let Some(location) = changes.location {
            active_model.location = Set(Some(location));
        }
        if let Some(event_type) = changes.event_type {
            active_model.event_type = Set(Some(event_type));
        }
        if let Some(image_url) = changes.image_url {
            active_model.image_url = Set(Some(image_url));
        }
        if let Some(registration_url) = changes.registration_url {
            active_model.registration_url = Set(Some(registration_url));
        }
        if let Some(archived) = changes.archived {
            active_model.archived = Set(archived);
        }
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(db_err("update event"))?;

        Ok(Some(Self::to_domain(updated)))
    }

    async fn archive(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = Events::update_many()
            .col_expr(events::Column::Archived, Expr::value(true))
            .col_expr(events::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(events::Column::Id.eq(id))
            .exec(self.db.get_connection())
            .await
            .map_err(db_err("archive event"))?;

        Ok(result.rows_affected > 0)
    }
}
