use sea_orm_migration::prelude::*;

use super::execute_all;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// A family is active while any of its members is active. Members without a
/// family mirror their own flag.
const UP: &[&str] = &[r#"CREATE OR REPLACE FUNCTION calculate_family_active_status() RETURNS void AS $$
BEGIN
    UPDATE member m
       SET family_is_active = EXISTS (
               SELECT 1 FROM member other
                WHERE other.family_id = m.family_id
                  AND other.is_active)
     WHERE m.family_id IS NOT NULL;

    UPDATE member
       SET family_is_active = is_active
     WHERE family_id IS NULL;

    UPDATE family f
       SET is_active = sub.active,
           updated_at = NOW()
      FROM (SELECT fam.id,
                   EXISTS (SELECT 1 FROM member m WHERE m.family_id = fam.id AND m.is_active) AS active
              FROM family fam) sub
     WHERE sub.id = f.id
       AND f.is_active IS DISTINCT FROM sub.active;
END;
$$ LANGUAGE plpgsql"#];

const DOWN: &[&str] = &["DROP FUNCTION IF EXISTS calculate_family_active_status()"];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        execute_all(manager, UP).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        execute_all(manager, DOWN).await
    }
}
