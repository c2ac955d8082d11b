use sea_orm_migration::prelude::*;

use super::execute_all;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Databases bootstrapped by hand already have some of these tables, so every
// statement tolerates existing objects.
const UP: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS facility (
        id SERIAL PRIMARY KEY,
        name VARCHAR(200) NOT NULL,
        slug VARCHAR(100) NOT NULL UNIQUE,
        timezone VARCHAR(64) NOT NULL DEFAULT 'America/Chicago',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS family (
        id SERIAL PRIMARY KEY,
        facility_id INTEGER REFERENCES facility(id),
        family_name VARCHAR(200),
        primary_member_id INTEGER,
        primary_user_id INTEGER,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS member (
        id SERIAL PRIMARY KEY,
        facility_id INTEGER REFERENCES facility(id),
        family_id INTEGER REFERENCES family(id) ON DELETE SET NULL,
        first_name VARCHAR(100) NOT NULL,
        last_name VARCHAR(100) NOT NULL DEFAULT '',
        email VARCHAR(255),
        username VARCHAR(50),
        password_hash VARCHAR(255),
        phone VARCHAR(30),
        date_of_birth DATE,
        status VARCHAR(20) NOT NULL DEFAULT 'active',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        family_is_active BOOLEAN NOT NULL DEFAULT TRUE,
        medical_notes TEXT,
        internal_flags TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "ALTER TABLE member ADD COLUMN IF NOT EXISTS username VARCHAR(50)",
    "ALTER TABLE member ADD COLUMN IF NOT EXISTS password_hash VARCHAR(255)",
    "ALTER TABLE member ADD COLUMN IF NOT EXISTS phone VARCHAR(30)",
    "ALTER TABLE member ADD COLUMN IF NOT EXISTS is_active BOOLEAN NOT NULL DEFAULT TRUE",
    "ALTER TABLE member ADD COLUMN IF NOT EXISTS family_is_active BOOLEAN NOT NULL DEFAULT TRUE",
    "ALTER TABLE member ADD COLUMN IF NOT EXISTS medical_notes TEXT",
    "ALTER TABLE member ADD COLUMN IF NOT EXISTS internal_flags TEXT",
    "ALTER TABLE family ADD COLUMN IF NOT EXISTS primary_member_id INTEGER",
    "CREATE INDEX IF NOT EXISTS idx_member_identity ON member (first_name, last_name, date_of_birth, family_id)",
    "CREATE INDEX IF NOT EXISTS idx_member_family ON member (family_id)",
    "CREATE INDEX IF NOT EXISTS idx_member_email ON member (lower(email))",
    r#"CREATE TABLE IF NOT EXISTS family_guardian (
        id SERIAL PRIMARY KEY,
        family_id INTEGER NOT NULL REFERENCES family(id) ON DELETE CASCADE,
        member_id INTEGER REFERENCES member(id) ON DELETE CASCADE,
        user_id INTEGER,
        relationship VARCHAR(50),
        is_primary BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "ALTER TABLE family_guardian ADD COLUMN IF NOT EXISTS member_id INTEGER",
    r#"CREATE TABLE IF NOT EXISTS parent_guardian_authority (
        id SERIAL PRIMARY KEY,
        guardian_member_id INTEGER NOT NULL REFERENCES member(id) ON DELETE CASCADE,
        minor_member_id INTEGER NOT NULL REFERENCES member(id) ON DELETE CASCADE,
        family_id INTEGER REFERENCES family(id) ON DELETE SET NULL,
        authority_type VARCHAR(30) NOT NULL DEFAULT 'parent',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (guardian_member_id, minor_member_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS user_role (
        id SERIAL PRIMARY KEY,
        user_id INTEGER,
        member_id INTEGER REFERENCES member(id) ON DELETE CASCADE,
        role VARCHAR(50) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS emergency_contact (
        id SERIAL PRIMARY KEY,
        member_id INTEGER REFERENCES member(id) ON DELETE CASCADE,
        name VARCHAR(200) NOT NULL,
        phone VARCHAR(30),
        relationship VARCHAR(50),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
];

const DOWN: &[&str] = &[
    "DROP TABLE IF EXISTS emergency_contact",
    "DROP TABLE IF EXISTS user_role",
    "DROP TABLE IF EXISTS parent_guardian_authority",
    "DROP TABLE IF EXISTS family_guardian",
    "DROP TABLE IF EXISTS member",
    "DROP TABLE IF EXISTS family",
    "DROP TABLE IF EXISTS facility",
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
