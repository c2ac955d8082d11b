//! Admin account repository implementation using SeaORM

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use gymdesk_api_types::{normalize_email, Admin};
use gymdesk_interfaces::{AdminChanges, AdminCredentials, AdminRepository, DatabaseError, NewAdmin};

use crate::seaorm::{
    connection::DatabaseConnection,
    entities::{admins, Admins},
    errors::{db_err, parse_column},
};

/// SeaORM implementation of the AdminRepository
#[derive(Clone)]
pub struct SeaOrmAdminRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAdminRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: admins::Model) -> Admin {
        Admin {
            id: model.id,
            email: model.email,
            name: model.name,
            role: parse_column(&model.role, "admins.role"),
            is_active: model.is_active,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl AdminRepository for SeaOrmAdminRepository {
    async fn create(&self, admin: NewAdmin) -> Result<Admin, DatabaseError> {
        let now = Utc::now();
        let active_model = admins::ActiveModel {
            email: Set(normalize_email(&admin.email)),
            name: Set(admin.name),
            password_hash: Set(admin.password_hash),
            role: Set(admin.role.to_string()),
            is_active: Set(true),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = active_model
            .insert(self.db.get_connection())
            .await
            .map_err(db_err("create admin"))?;

        Ok(Self::to_domain(result))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Admin>, DatabaseError> {
        let row = Admins::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find admin by id"))?;

        Ok(row.map(Self::to_domain))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<AdminCredentials>, DatabaseError> {
        let row = Admins::find()
            .filter(Expr::expr(Func::lower(Expr::col(admins::Column::Email))).eq(normalize_email(email)))
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find admin by email"))?;

        Ok(row.map(|model| {
            let password_hash = model.password_hash.clone();
            AdminCredentials {
                admin: Self::to_domain(model),
                password_hash,
            }
        }))
    }

    async fn list(&self) -> Result<Vec<Admin>, DatabaseError> {
        let rows = Admins::find()
            .order_by_asc(admins::Column::Email)
            .all(self.db.get_connection())
            .await
            .map_err(db_err("list admins"))?;

        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    async fn update(&self, id: i32, changes: AdminChanges) -> Result<Option<Admin>, DatabaseError> {
        let Some(existing) = Admins::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find admin for update"))?
        else {
            return Ok(None);
        };

        let mut active_model: admins::ActiveModel = existing.into();
        if let Some(email) = changes.email {
            active_model.email = Set(normalize_email(&email));
        }
        if let Some(name) = changes.name {
            active_model.name = Set(name);
        }
        if let Some(password_hash) = changes.password_hash {
            active_model.password_hash = Set(password_hash);
        }
        if let Some(role) = changes.role {
            active_model.role = Set(role.to_string());
        }
        if let Some(is_active) = changes.is_active {
            active_model.is_active = Set(is_active);
        }
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(db_err("update admin"))?;

        Ok(Some(Self::to_domain(updated)))
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = Admins::delete_by_id(id)
            .exec(self.db.get_connection())
            .await
            .map_err(db_err("delete admin"))?;

        Ok(result.rows_affected > 0)
    }

    async fn count_active(&self) -> Result<u64, DatabaseError> {
        Admins::find()
            .filter(admins::Column::IsActive.eq(true))
            .count(self.db.get_connection())
            .await
            .map_err(db_err("count active admins"))
    }

    async fn record_login(&self, id: i32) -> Result<(), DatabaseError> {
        Admins::update_many()
            .col_expr(admins::Column::LastLoginAt, Expr::value(Utc::now()))
            .filter(admins::Column::Id.eq(id))
            .exec(self.db.get_connection())
            .await
            .map_err(db_err("record admin login"))?;

        Ok(())
    }
}
