//! Unified member entity
//!
//! Replaces the legacy `app_user`, `athlete` and `members` tables. Guardians,
//! athletes and adult students are all rows here; family links and
//! guardian authority live in their own tables.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub facility_id: Option<i32>,
    pub family_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
    /// active, inactive, pending, legacy or archived
    pub status: String,
    pub is_active: bool,
    /// Maintained by `calculate_family_active_status()`
    pub family_is_active: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub medical_notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub internal_flags: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::member_program::Entity")]
    Enrollments,
}

impl Related<super::member_program::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
