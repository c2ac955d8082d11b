use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use gymdesk_api_types::{ClassIteration, CreateClassIterationRequest, DurationType, UpdateClassIterationRequest};
use gymdesk_interfaces::{ClassIterationRepository, DatabaseError};

use crate::seaorm::{
    connection::DatabaseConnection,
    entities::{class_iteration, ClassIterations, Programs},
    errors::{db_err, parse_column},
};

#[derive(Clone)]
pub struct SeaOrmClassIterationRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmClassIterationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn to_domain(model: class_iteration::Model) -> ClassIteration {
        ClassIteration {
            id: model.id,
            program_id: model.program_id,
            iteration_number: model.iteration_number,
            days_of_week: model.days_of_week,
            start_time: model.start_time,
            end_time: model.end_time,
            duration_type: parse_column(&model.duration_type, "class_iteration.duration_type"),
            start_date: model.start_date,
            end_date: model.end_date,
            capacity: model.capacity,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl ClassIterationRepository for SeaOrmClassIterationRepository {
    async fn create(
        &self,
        program_id: i32,
        request: CreateClassIterationRequest,
    ) -> Result<ClassIteration, DatabaseError> {
        let db = self.db.get_connection();

        if Programs::find_by_id(program_id)
            .one(db)
            .await
            .map_err(db_err("find program for class iteration"))?
            .is_none()
        {
            return Err(DatabaseError::not_found("program", program_id));
        }

        let iteration_number = match request.iteration_number {
            Some(number) => number,
            None => {
                let last = ClassIterations::find()
                    .filter(class_iteration::Column::ProgramId.eq(program_id))
                    .order_by_desc(class_iteration::Column::IterationNumber)
                    .one(db)
                    .await
                    .map_err(db_err("find last class iteration"))?;
                last.map_or(1, |row| row.iteration_number + 1)
            }
        };

        let now = Utc::now();
        let active_model = class_iteration::ActiveModel {
            program_id: Set(program_id),
            iteration_number: Set(iteration_number),
            days_of_week: Set(request.days_of_week),
            start_time: Set(request.start_time),
            end_time: Set(request.end_time),
            duration_type: Set(request.duration_type.unwrap_or(DurationType::Indefinite).to_string()),
            start_date: Set(request.start_date),
            end_date: Set(request.end_date),
            capacity: Set(request.capacity),
            is_active: Set(request.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = active_model.insert(db).await.map_err(db_err("create class iteration"))?;

        Ok(Self::to_domain(result))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ClassIteration>, DatabaseError> {
        let row = ClassIterations::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find class iteration by id"))?;

        Ok(row.map(Self::to_domain))
    }

    async fn list_for_program(&self, program_id: i32) -> Result<Vec<ClassIteration>, DatabaseError> {
        let rows = ClassIterations::find()
            .filter(class_iteration::Column::ProgramId.eq(program_id))
            .order_by_asc(class_iteration::Column::IterationNumber)
            .all(self.db.get_connection())
            .await
            .map_err(db_err("list class iterations"))?;

        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    async fn update(
        &self,
        id: i32,
        changes: UpdateClassIterationRequest,
    ) -> Result<Option<ClassIteration>, DatabaseError> {
        let Some(existing) = ClassIterations::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find class iteration for update"))?
        else {
            return Ok(None);
        };

        // Partial updates can still invert the time range
        let start = changes.start_time.unwrap_or(existing.start_time);
        let end = changes.end_time.unwrap_or(existing.end_time);
        if end <= start {
            return Err(DatabaseError::Validation {
                message: "end_time must be after start_time".to_string(),
            });
        }

        let mut active_model: class_iteration::ActiveModel = existing.into();
        if let Some(iteration_number) = changes.iteration_number {
            active_model.iteration_number = Set(iteration_number);
        }
        if let Some(days_of_week) = changes.days_of_week {
            active_model.days_of_week = Set(days_of_week);
        }
        active_model.start_time = Set(start);
        active_model.end_time = Set(end);
        if let Some(duration_type) = changes.duration_type {
            active_model.duration_type = Set(duration_type.to_string());
        }
        if let Some(start_date) = changes.start_date {
            active_model.start_date = Set(Some(start_date));
        }
        if let Some(end_date) = changes.end_date {
            active_model.end_date = Set(Some(end_date));
        }
        if let Some(capacity) = changes.capacity {
            active_model.capacity = Set(Some(capacity));
        }
        if let Some(is_active) = changes.is_active {
            active_model.is_active = Set(is_active);
        }
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(db_err("update class iteration"))?;

        Ok(Some(Self::to_domain(updated)))
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = ClassIterations::delete_by_id(id)
            .exec(self.db.get_connection())
            .await
            .map_err(db_err("delete class iteration"))?;

        Ok(result.rows_affected > 0)
    }
}
