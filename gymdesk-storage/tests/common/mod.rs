//! Shared helpers for the PostgreSQL-backed tests
//!
//! Tests run only when `GYMDESK_TEST_DATABASE_URL` points at a database the
//! test user may create schemas in. Each test gets its own schema.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use gymdesk_config::DatabaseConfig;
use gymdesk_storage::DatabaseConnection;
use sea_orm::ConnectionTrait;

pub const TEST_DATABASE_URL_VAR: &str = "GYMDESK_TEST_DATABASE_URL";

static SCHEMA_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub struct TestDb {
    pub db: DatabaseConnection,
    admin: DatabaseConnection,
    pub schema: String,
}

impl TestDb {
    /// `None` when no test database is configured
    pub async fn create() -> Option<Self> {
        let url = match std::env::var(TEST_DATABASE_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => {
                eprintln!("{} not set, skipping", TEST_DATABASE_URL_VAR);
                return None;
            }
        };

        let config = DatabaseConfig {
            url,
            max_connections: 2,
            min_connections: 0,
            ..Default::default()
        };

        let schema = format!(
            "gymdesk_test_{}_{}",
            std::process::id(),
            SCHEMA_COUNTER.fetch_add(1, Ordering::SeqCst)
        );

        let admin = DatabaseConnection::new(config.clone()).await.unwrap();
        admin
            .get_connection()
            .execute_unprepared(&format!("CREATE SCHEMA {}", schema))
            .await
            .unwrap();

        let db = DatabaseConnection::with_schema(config, &schema).await.unwrap();
        Some(Self { db, admin, schema })
    }

    pub async fn execute(&self, sql: &str) {
        self.db.get_connection().execute_unprepared(sql).await.unwrap();
    }

    /// `sql` must select a single column aliased `value`
    pub async fn scalar(&self, sql: &str) -> i64 {
        gymdesk_storage::migration::SchemaProbe::new(self.db.get_connection())
            .scalar_i64(sql)
            .await
            .unwrap()
    }

    /// Unified schema plus the legacy identity tables, empty
    pub async fn with_legacy_schema(self) -> Self {
        self.db.migrate().await.unwrap();
        self.execute(LEGACY_DDL).await;
        self
    }

    pub async fn drop_schema(self) {
        self.db.close().await.unwrap();
        self.admin
            .get_connection()
            .execute_unprepared(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .await
            .unwrap();
    }
}

/// The pre-consolidation tables as they exist in older deployments
pub const LEGACY_DDL: &str = r#"
CREATE TABLE app_user (
    id INTEGER PRIMARY KEY,
    facility_id INTEGER,
    role VARCHAR(30),
    email VARCHAR(255) NOT NULL,
    full_name VARCHAR(200),
    password_hash VARCHAR(255),
    is_active BOOLEAN
);
CREATE TABLE athlete (
    id INTEGER PRIMARY KEY,
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100),
    date_of_birth DATE,
    family_id INTEGER,
    user_id INTEGER,
    status VARCHAR(20),
    medical_notes TEXT,
    internal_flags JSONB
);
CREATE TABLE athlete_program (
    id SERIAL PRIMARY KEY,
    athlete_id INTEGER NOT NULL REFERENCES athlete(id),
    program_id INTEGER NOT NULL,
    class_iteration_id INTEGER,
    status VARCHAR(20),
    enrolled_at TIMESTAMPTZ
);
CREATE TABLE members (
    id SERIAL PRIMARY KEY,
    name VARCHAR(200)
);
ALTER TABLE emergency_contact ADD COLUMN athlete_id INTEGER;
"#;
