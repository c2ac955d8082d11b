//! Registration repository implementation using SeaORM

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use gymdesk_api_types::{normalize_email, CreateRegistrationRequest, Registration, RegistrationStatus, UpdateRegistrationRequest};
use gymdesk_interfaces::{DatabaseError, RegistrationFilters, RegistrationRepository};

use crate::seaorm::{
    connection::DatabaseConnection,
    entities::{registrations, Registrations},
    errors::{db_err, parse_column},
};

/// SeaORM implementation of the RegistrationRepository
#[derive(Clone)]
pub struct SeaOrmRegistrationRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: registrations::Model) -> Registration {
        Registration {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            athlete_name: model.athlete_name,
            athlete_age: model.athlete_age,
            interests: model.interests,
            message: model.message,
            status: parse_column(&model.status, "registrations.status"),
            notes: model.notes,
            archived: model.archived,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl RegistrationRepository for SeaOrmRegistrationRepository {
    async fn create(&self, request: CreateRegistrationRequest) -> Result<Registration, DatabaseError> {
        let now = Utc::now();
        let active_model = registrations::ActiveModel {
            first_name: Set(request.first_name.trim().to_string()),
            last_name: Set(request.last_name.trim().to_string()),
            email: Set(normalize_email(&request.email)),
            phone: Set(request.phone),
            athlete_name: Set(request.athlete_name),
            athlete_age: Set(request.athlete_age),
            interests: Set(request.interests),
            message: Set(request.message),
            status: Set(RegistrationStatus::New.to_string()),
            notes: Set(None),
            archived: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = active_model
            .insert(self.db.get_connection())
            .await
            .map_err(db_err("create registration"))?;

        Ok(Self::to_domain(result))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Registration>, DatabaseError> {
        let row = Registrations::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find registration by id"))?;

        Ok(row.map(Self::to_domain))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Registration>, DatabaseError> {
        let row = Registrations::find()
            .filter(Expr::expr(Func::lower(Expr::col(registrations::Column::Email))).eq(normalize_email(email)))
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find registration by email"))?;

        Ok(row.map(Self::to_domain))
    }

    async fn list(&self, filters: RegistrationFilters) -> Result<Vec<Registration>, DatabaseError> {
        let mut query = Registrations::find();

        if !filters.include_archived {
            query = query.filter(registrations::Column::Archived.eq(false));
        }

        if let Some(status) = filters.status {
            query = query.filter(registrations::Column::Status.eq(status.as_str()));
        }

        let rows = query
            .order_by_desc(registrations::Column::CreatedAt)
            .all(self.db.get_connection())
            .await
            .map_err(db_err("list registrations"))?;

        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    async fn update(
        &self,
        id: i32,
        changes: UpdateRegistrationRequest,
    ) -> Result<Option<Registration>, DatabaseError> {
        let Some(existing) = Registrations::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find registration for update"))?
        else {
            return Ok(None);
        };

        let mut active_model: registrations::ActiveModel = existing.into();
        if let Some(status) = changes.status {
            active_model.status = Set(status.to_string());
        }
        if let Some(notes) = changes.notes {
            active_model.notes = Set(Some(notes));
        }
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(db_err("update registration"))?;

        Ok(Some(Self::to_domain(updated)))
    }

    async fn archive(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = Registrations::update_many()
            .col_expr(registrations::Column::Archived, Expr::value(true))
            .col_expr(registrations::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(registrations::Column::Id.eq(id))
            .exec(self.db.get_connection())
            .await
            .map_err(db_err("archive registration"))?;

        Ok(result.rows_affected > 0)
    }
}
