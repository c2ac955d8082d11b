//! Program repository implementation using SeaORM

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use gymdesk_api_types::{CreateProgramRequest, Program, ProgramWithSchedule, UpdateProgramRequest};
use gymdesk_interfaces::{DatabaseError, ProgramFilters, ProgramRepository};

use super::{SeaOrmCategoryRepository, SeaOrmClassIterationRepository};
use crate::seaorm::{
    connection::DatabaseConnection,
    entities::{category, class_iteration, program, Categories, ClassIterations, Programs},
    errors::db_err,
};

#[derive(Clone)]
pub struct SeaOrmProgramRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProgramRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: program::Model) -> Program {
        Program {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            display_name: model.display_name,
            description: model.description,
            skill_level: model.skill_level,
            age_min: model.age_min,
            age_max: model.age_max,
            is_active: model.is_active,
            archived: model.archived,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl ProgramRepository for SeaOrmProgramRepository {
    async fn create(&self, request: CreateProgramRequest) -> Result<Program, DatabaseError> {
        let now = Utc::now();
        let active_model = program::ActiveModel {
            facility_id: Set(None),
            category_id: Set(request.category_id),
            name: Set(request.name),
            display_name: Set(request.display_name),
            description: Set(request.description),
            skill_level: Set(request.skill_level),
            age_min: Set(request.age_min),
            age_max: Set(request.age_max),
            is_active: Set(request.is_active.unwrap_or(true)),
            archived: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = active_model
            .insert(self.db.get_connection())
            .await
            .map_err(db_err("create program"))?;

        Ok(Self::to_domain(result))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Program>, DatabaseError> {
        let row = Programs::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find program by id"))?;

        Ok(row.map(Self::to_domain))
    }

    async fn list(&self, filters: ProgramFilters) -> Result<Vec<Program>, DatabaseError> {
        let mut query = Programs::find();

        if !filters.include_archived {
            query = query.filter(program::Column::Archived.eq(false));
        }
        if filters.active_only {
            query = query.filter(program::Column::IsActive.eq(true));
        }
        if let Some(category_id) = filters.category_id {
            query = query.filter(program::Column::CategoryId.eq(category_id));
        }

        let rows = query
            .order_by_asc(program::Column::Name)
            .all(self.db.get_connection())
            .await
            .map_err(db_err("list programs"))?;

        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    async fn update(&self, id: i32, changes: UpdateProgramRequest) -> Result<Option<Program>, DatabaseError> {
        let Some(existing) = Programs::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find program for update"))?
        else {
            return Ok(None);
        };

        let mut active_model: program::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active_model.name = Set(name);
        }
        if let Some(display_name) = changes.display_name {
            active_model.display_name = Set(Some(display_name));
        }
        if let Some(category_id) = changes.category_id {
            active_model.category_id = Set(Some(category_id));
        }
        if let Some(description) = changes.description {
            active_model.description = Set(Some(description));
        }
        if let Some(skill_level) = changes.skill_level {
            active_model.skill_level = Set(Some(skill_level));
        }
        if let Some(age_min) = changes.age_min {
            active_model.age_min = Set(Some(age_min));
        }
        if let Some(age_max) = changes.age_max {
            active_model.age_max = Set(Some(age_max));
        }
        if let Some(is_active) = changes.is_active {
            active_model.is_active = Set(is_active);
        }
        if let Some(archived) = changes.archived {
            active_model.archived = Set(archived);
        }
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(db_err("update program"))?;

        Ok(Some(Self::to_domain(updated)))
    }

    async fn archive(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = Programs::update_many()
            .col_expr(program::Column::Archived, Expr::value(true))
            .col_expr(program::Column::IsActive, Expr::value(false))
            .col_expr(program::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(program::Column::Id.eq(id))
            .exec(self.db.get_connection())
            .await
            .map_err(db_err("archive program"))?;

        Ok(result.rows_affected > 0)
    }

    async fn catalog(&self) -> Result<Vec<ProgramWithSchedule>, DatabaseError> {
        let db = self.db.get_connection();

        let programs = Programs::find()
            .filter(program::Column::Archived.eq(false))
            .filter(program::Column::IsActive.eq(true))
            .order_by_asc(program::Column::Name)
            .all(db)
            .await
            .map_err(db_err("list catalog programs"))?;

        let program_ids: Vec<i32> = programs.iter().map(|p| p.id).collect();

        let categories: HashMap<i32, category::Model> = Categories::find()
            .filter(category::Column::Archived.eq(false))
            .all(db)
            .await
            .map_err(db_err("list catalog categories"))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut iterations: HashMap<i32, Vec<class_iteration::Model>> = HashMap::new();
        for row in ClassIterations::find()
            .filter(class_iteration::Column::ProgramId.is_in(program_ids))
            .filter(class_iteration::Column::IsActive.eq(true))
            .order_by_asc(class_iteration::Column::IterationNumber)
            .all(db)
            .await
            .map_err(db_err("list catalog iterations"))?
        {
            iterations.entry(row.program_id).or_default().push(row);
        }

        let mut catalog: Vec<ProgramWithSchedule> = programs
            .into_iter()
            .map(|p| {
                let category = p
                    .category_id
                    .and_then(|id| categories.get(&id).cloned())
                    .map(SeaOrmCategoryRepository::to_domain);
                let schedule = iterations
                    .remove(&p.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(SeaOrmClassIterationRepository::to_domain)
                    .collect();
                ProgramWithSchedule {
                    program: Self::to_domain(p),
                    category,
                    iterations: schedule,
                }
            })
            .collect();

        // Category order first, uncategorised programs last
        catalog.sort_by_key(|entry| {
            (
                entry.category.as_ref().map_or(i32::MAX, |c| c.display_order),
                entry.program.name.clone(),
            )
        });

        Ok(catalog)
    }
}
