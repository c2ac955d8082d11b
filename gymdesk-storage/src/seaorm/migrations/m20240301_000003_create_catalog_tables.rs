use sea_orm_migration::prelude::*;

use super::execute_all;

#[derive(DeriveMigrationName)]
pub struct Migration;

const UP: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS category (
        id SERIAL PRIMARY KEY,
        facility_id INTEGER REFERENCES facility(id),
        name VARCHAR(50) NOT NULL UNIQUE,
        display_name VARCHAR(100) NOT NULL,
        description TEXT,
        display_order INTEGER NOT NULL DEFAULT 0,
        archived BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS program (
        id SERIAL PRIMARY KEY,
        facility_id INTEGER REFERENCES facility(id),
        category_id INTEGER REFERENCES category(id) ON DELETE SET NULL,
        name VARCHAR(100) NOT NULL,
        display_name VARCHAR(150),
        description TEXT,
        skill_level VARCHAR(50),
        age_min INTEGER,
        age_max INTEGER,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        archived BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "ALTER TABLE program ADD COLUMN IF NOT EXISTS category_id INTEGER REFERENCES category(id) ON DELETE SET NULL",
    "ALTER TABLE program ADD COLUMN IF NOT EXISTS archived BOOLEAN NOT NULL DEFAULT FALSE",
    r#"CREATE TABLE IF NOT EXISTS class_iteration (
        id SERIAL PRIMARY KEY,
        program_id INTEGER NOT NULL REFERENCES program(id) ON DELETE CASCADE,
        iteration_number INTEGER NOT NULL DEFAULT 1,
        days_of_week INTEGER[] NOT NULL DEFAULT '{}',
        start_time TIME NOT NULL,
        end_time TIME NOT NULL,
        duration_type VARCHAR(20) NOT NULL DEFAULT 'indefinite',
        start_date DATE,
        end_date DATE,
        capacity INTEGER,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_class_iteration_program ON class_iteration (program_id)",
    r#"CREATE TABLE IF NOT EXISTS member_program (
        id SERIAL PRIMARY KEY,
        member_id INTEGER NOT NULL REFERENCES member(id) ON DELETE CASCADE,
        program_id INTEGER NOT NULL REFERENCES program(id) ON DELETE CASCADE,
        class_iteration_id INTEGER REFERENCES class_iteration(id) ON DELETE SET NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'active',
        enrolled_at TIMESTAMPTZ DEFAULT NOW(),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_member_program_member ON member_program (member_id)",
];

const DOWN: &[&str] = &[
    "DROP TABLE IF EXISTS member_program",
    "DROP TABLE IF EXISTS class_iteration",
    "DROP TABLE IF EXISTS program",
    "DROP TABLE IF EXISTS category",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        execute_all(manager, UP).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        execute_all(manager, DOWN).await
    }
}
