//! Member repository implementation using SeaORM

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

use gymdesk_api_types::{
    normalize_email, CreateEnrollmentRequest, Enrollment, EnrollmentStatus, Member, MemberStatus,
};
use gymdesk_interfaces::{DatabaseError, MemberChanges, MemberFilters, MemberRepository, NewMember};

use crate::seaorm::{
    connection::DatabaseConnection,
    entities::{member, member_program, ClassIterations, MemberPrograms, Members},
    errors::{db_err, parse_column},
};

/// SeaORM implementation of the MemberRepository
#[derive(Clone)]
pub struct SeaOrmMemberRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmMemberRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: member::Model) -> Member {
        Member {
            id: model.id,
            facility_id: model.facility_id,
            family_id: model.family_id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            username: model.username,
            phone: model.phone,
            date_of_birth: model.date_of_birth,
            status: parse_column(&model.status, "member.status"),
            is_active: model.is_active,
            family_is_active: model.family_is_active,
            medical_notes: model.medical_notes,
            internal_flags: model.internal_flags,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    fn enrollment_to_domain(model: member_program::Model) -> Enrollment {
        Enrollment {
            id: model.id,
            member_id: model.member_id,
            program_id: model.program_id,
            class_iteration_id: model.class_iteration_id,
            status: parse_column(&model.status, "member_program.status"),
            enrolled_at: model.enrolled_at,
            created_at: model.created_at,
        }
    }

    /// Apply filters to member query
    fn apply_filters(query: sea_orm::Select<member::Entity>, filters: &MemberFilters) -> sea_orm::Select<member::Entity> {
        let mut query = query;

        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(member::Column::FirstName))).like(pattern.clone()))
                    .add(Expr::expr(Func::lower(Expr::col(member::Column::LastName))).like(pattern.clone()))
                    .add(Expr::expr(Func::lower(Expr::col(member::Column::Email))).like(pattern)),
            );
        }

        match filters.status {
            Some(status) => query = query.filter(member::Column::Status.eq(status.as_str())),
            None if !filters.include_archived => {
                query = query.filter(member::Column::Status.ne(MemberStatus::Archived.as_str()))
            }
            None => {}
        }

        if let Some(family_id) = filters.family_id {
            query = query.filter(member::Column::FamilyId.eq(family_id));
        }

        query
    }
}

#[async_trait]
impl MemberRepository for SeaOrmMemberRepository {
    async fn create(&self, new_member: NewMember) -> Result<Member, DatabaseError> {
        let now = Utc::now();
        let active_model = member::ActiveModel {
            facility_id: Set(new_member.facility_id),
            family_id: Set(new_member.family_id),
            first_name: Set(new_member.first_name),
            last_name: Set(new_member.last_name),
            email: Set(new_member.email.as_deref().map(normalize_email)),
            username: Set(new_member.username),
            password_hash: Set(new_member.password_hash),
            phone: Set(new_member.phone),
            date_of_birth: Set(new_member.date_of_birth),
            status: Set(new_member.status.to_string()),
            is_active: Set(new_member.status.is_active()),
            family_is_active: Set(new_member.status.is_active()),
            medical_notes: Set(new_member.medical_notes),
            internal_flags: Set(new_member.internal_flags),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = active_model
            .insert(self.db.get_connection())
            .await
            .map_err(db_err("create member"))?;

        Ok(Self::to_domain(result))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Member>, DatabaseError> {
        let row = Members::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find member by id"))?;

        Ok(row.map(Self::to_domain))
    }

    async fn list(&self, filters: MemberFilters) -> Result<Vec<Member>, DatabaseError> {
        let rows = Self::apply_filters(Members::find(), &filters)
            .order_by_asc(member::Column::LastName)
            .order_by_asc(member::Column::FirstName)
            .order_by_asc(member::Column::Id)
            .all(self.db.get_connection())
            .await
            .map_err(db_err("list members"))?;

        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    async fn update(&self, id: i32, changes: MemberChanges) -> Result<Option<Member>, DatabaseError> {
        let Some(existing) = Members::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(db_err("find member for update"))?
        else {
            return Ok(None);
        };

        let mut active_model: member::ActiveModel = existing.into();
        if let Some(first_name) = changes.first_name {
            active_model.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active_model.last_name = Set(last_name);
        }
        if let Some(email) = changes.email {
            active_model.email = Set(Some(normalize_email(&email)));
        }
        if let Some(username) = changes.username {
            active_model.username = Set(Some(username));
        }
        if let Some(phone) = changes.phone {
            active_model.phone = Set(Some(phone));
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            active_model.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(family_id) = changes.family_id {
            active_model.family_id = Set(Some(family_id));
        }
        if let Some(status) = changes.status {
            active_model.status = Set(status.to_string());
            active_model.is_active = Set(status.is_active());
        }
        if let Some(medical_notes) = changes.medical_notes {
            active_model.medical_notes = Set(Some(medical_notes));
        }
        if let Some(internal_flags) = changes.internal_flags {
            active_model.internal_flags = Set(Some(internal_flags));
        }
        if let Some(password_hash) = changes.password_hash {
            active_model.password_hash = Set(Some(password_hash));
        }
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(db_err("update member"))?;

        Ok(Some(Self::to_domain(updated)))
    }

    async fn archive(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = Members::update_many()
            .col_expr(member::Column::Status, Expr::value(MemberStatus::Archived.as_str()))
            .col_expr(member::Column::IsActive, Expr::value(false))
            .col_expr(member::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(member::Column::Id.eq(id))
            .exec(self.db.get_connection())
            .await
            .map_err(db_err("archive member"))?;

        Ok(result.rows_affected > 0)
    }

    async fn list_enrollments(&self, member_id: i32) -> Result<Vec<Enrollment>, DatabaseError> {
        let rows = MemberPrograms::find()
            .filter(member_program::Column::MemberId.eq(member_id))
            .order_by_asc(member_program::Column::CreatedAt)
            .order_by_asc(member_program::Column::Id)
            .all(self.db.get_connection())
            .await
            .map_err(db_err("list enrollments"))?;

        Ok(rows.into_iter().map(Self::enrollment_to_domain).collect())
    }

    async fn enroll(&self, member_id: i32, request: CreateEnrollmentRequest) -> Result<Enrollment, DatabaseError> {
        let db = self.db.get_connection();

        if Members::find_by_id(member_id)
            .one(db)
            .await
            .map_err(db_err("find member for enrollment"))?
            .is_none()
        {
            return Err(DatabaseError::not_found("member", member_id));
        }

        if let Some(iteration_id) = request.class_iteration_id {
            let iteration = ClassIterations::find_by_id(iteration_id)
                .one(db)
                .await
                .map_err(db_err("find class iteration for enrollment"))?
                .ok_or_else(|| DatabaseError::not_found("class_iteration", iteration_id))?;

            if iteration.program_id != request.program_id {
                return Err(DatabaseError::Validation {
                    message: format!(
                        "class iteration {} does not belong to program {}",
                        iteration_id, request.program_id
                    ),
                });
            }
        }

        let now = Utc::now();
        let active_model = member_program::ActiveModel {
            member_id: Set(member_id),
            program_id: Set(request.program_id),
            class_iteration_id: Set(request.class_iteration_id),
            status: Set(request.status.unwrap_or(EnrollmentStatus::Active).to_string()),
            enrolled_at: Set(Some(now)),
            created_at: Set(now),
            ..Default::default()
        };

        let result = active_model.insert(db).await.map_err(db_err("create enrollment"))?;

        Ok(Self::enrollment_to_domain(result))
    }

    async fn remove_enrollment(&self, member_id: i32, enrollment_id: i32) -> Result<bool, DatabaseError> {
        let result = MemberPrograms::delete_many()
            .filter(member_program::Column::Id.eq(enrollment_id))
            .filter(member_program::Column::MemberId.eq(member_id))
            .exec(self.db.get_connection())
            .await
            .map_err(db_err("remove enrollment"))?;

        Ok(result.rows_affected > 0)
    }
}
