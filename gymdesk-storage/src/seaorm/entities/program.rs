//! Programs offered by the studio, grouped by category

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "program")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub facility_id: Option<i32>,
    pub category_id: Option<i32>,
    pub name: String,
    pub display_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub skill_level: Option<String>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub is_active: bool,
    pub archived: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::class_iteration::Entity")]
    ClassIterations,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::class_iteration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassIterations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
