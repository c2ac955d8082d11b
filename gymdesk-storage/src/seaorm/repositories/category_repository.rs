use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use gymdesk_api_types::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use gymdesk_interfaces::{CategoryRepository, DatabaseError};

use crate::seaorm::{
    connection::DatabaseConnection,
    entities::{category, Categories},
    errors::db_err,
};

#[derive(Clone)]
pub struct SeaOrmCategoryRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn to_domain(model: category::Model) -> Category {
        Category {
            id: model.id,
            name: model.name,
            display_name: model.display_name,
            description: model.description,
            display_order: model.display_order,
            archived: model.archived,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn create(&self, request: CreateCategoryRequest) -> Result<Category, DatabaseError> {
        let now = Utc::now();
        let active_model = category::ActiveModel {
            facility_id: Set(None),
            name: Set(request.name.trim().to_lowercase()),
            display_name: Set(request.display_name),
            description: Set(request.description),
            display_order: Set(request.display_order.unwrap_or(0)),
            archived: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = active_model
            .insert(self.db.get_connection())
            .await
            .map_err(db_err("create category"))?;

        Ok(Self::to_domain(result))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DatabaseError> {
        let row = Categories::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find category by id"))?;

        Ok(row.map(Self::to_domain))
    }

    async fn list(&self, include_archived: bool) -> Result<Vec<Category>, DatabaseError> {
        let mut query = Categories::find();
        if !include_archived {
            query = query.filter(category::Column::Archived.eq(false));
        }

        let rows = query
            .order_by_asc(category::Column::DisplayOrder)
            .order_by_asc(category::Column::Name)
            .all(self.db.get_connection())
            .await
            .map_err(db_err("list categories"))?;

        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    async fn update(&self, id: i32, changes: UpdateCategoryRequest) -> Result<Option<Category>, DatabaseError> {
        let Some(existing) = Categories::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find category for update"))?
        else {
            return Ok(None);
        };

        let mut active_model: category::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active_model.name = Set(name.trim().to_lowercase());
        }
        if let Some(display_name) = changes.display_name {
            active_model.display_name = Set(display_name);
        }
        if let Some(description) = changes.description {
            active_model.description = Set(Some(description));
        }
        if let Some(display_order) = changes.display_order {
            active_model.display_order = Set(display_order);
        }
        if let Some(archived) = changes.archived {
            active_model.archived = Set(archived);
        }
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(db_err("update category"))?;

        Ok(Some(Self::to_domain(updated)))
    }

    async fn archive(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = Categories::update_many()
            .col_expr(category::Column::Archived, Expr::value(true))
            .col_expr(category::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(category::Column::Id.eq(id))
            .exec(self.db.get_connection())
            .await
            .map_err(db_err("archive category"))?;

        Ok(result.rows_affected > 0)
    }
}
