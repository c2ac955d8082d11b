use sea_orm_migration::prelude::*;

mod m20240301_000001_create_identity_tables;
mod m20240301_000002_create_site_tables;
mod m20240301_000003_create_catalog_tables;
mod m20240301_000004_family_status_function;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_identity_tables::Migration),
            Box::new(m20240301_000002_create_site_tables::Migration),
            Box::new(m20240301_000003_create_catalog_tables::Migration),
            Box::new(m20240301_000004_family_status_function::Migration),
        ]
    }
}

/// Run raw statements one at a time so a failure names the statement
pub(crate) async fn execute_all(manager: &SchemaManager<'_>, statements: &[&str]) -> Result<(), DbErr> {
    let db = manager.get_connection();
    for sql in statements {
        db.execute_unprepared(sql).await.map_err(|e| {
            let head: String = sql.trim().lines().next().unwrap_or_default().chars().take(80).collect();
            DbErr::Migration(format!("{} ({})", e, head))
        })?;
    }
    Ok(())
}
