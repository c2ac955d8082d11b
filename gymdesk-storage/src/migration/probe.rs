//! Catalog lookups used to decide which legacy steps apply

use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};

/// Schema introspection scoped to the connection's `current_schema()`
pub struct SchemaProbe<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SchemaProbe<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn table_exists(&self, table: &str) -> Result<bool, DbErr> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = $1) AS present",
            vec![table.into()],
        )
        .await
    }

    pub async fn column_exists(&self, table: &str, column: &str) -> Result<bool, DbErr> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2) AS present",
            vec![table.into(), column.into()],
        )
        .await
    }

    pub async fn function_exists(&self, name: &str) -> Result<bool, DbErr> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM pg_catalog.pg_proc p \
             WHERE p.proname = $1 AND pg_catalog.pg_function_is_visible(p.oid)) AS present",
            vec![name.into()],
        )
        .await
    }

    /// Row count of a table known to exist
    pub async fn count(&self, table: &str) -> Result<i64, DbErr> {
        self.scalar_i64(&format!("SELECT COUNT(*) AS value FROM {}", quote_ident(table)))
            .await
    }

    /// First column of a single-row query, named `value`
    pub async fn scalar_i64(&self, sql: &str) -> Result<i64, DbErr> {
        let row = self
            .db
            .query_one(Statement::from_string(DbBackend::Postgres, sql.to_string()))
            .await?;
        match row {
            Some(row) => row.try_get::<i64>("", "value"),
            None => Ok(0),
        }
    }

    async fn exists(&self, sql: &str, values: Vec<sea_orm::Value>) -> Result<bool, DbErr> {
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
            .await?;
        match row {
            Some(row) => row.try_get::<bool>("", "present"),
            None => Ok(false),
        }
    }
}

/// Double-quote an identifier for interpolation into SQL
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
