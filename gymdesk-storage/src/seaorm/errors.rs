//! Translation of sea-orm failures into repository errors

use gymdesk_interfaces::DatabaseError;
use sea_orm::{DbErr, RuntimeErr, SqlErr};

/// Map a sea-orm error to the repository error the API understands.
///
/// Unique violations become [`DatabaseError::Constraint`] (409 at the edge),
/// foreign-key violations become [`DatabaseError::Validation`] (400) and
/// pool exhaustion becomes [`DatabaseError::Connection`]. Everything else is
/// internal and keeps the driver message for the logs only.
pub fn map_db_err(context: &str, err: DbErr) -> DatabaseError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            return DatabaseError::Constraint {
                message: format!("{}: duplicate value ({})", context, detail),
            };
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            return DatabaseError::Validation {
                message: format!("{}: invalid reference to related resource ({})", context, detail),
            };
        }
        _ => {}
    }

    match err {
        DbErr::ConnectionAcquire(e) => DatabaseError::Connection {
            message: format!("{}: {}", context, e),
        },
        DbErr::Conn(RuntimeErr::SqlxError(e)) => DatabaseError::Connection {
            message: format!("{}: {}", context, e),
        },
        DbErr::RecordNotFound(what) => DatabaseError::NotFound {
            entity: context.to_string(),
            id: what,
        },
        other => DatabaseError::Internal {
            message: format!("Failed to {}: {}", context, other),
        },
    }
}

/// Shorthand for `.map_err(db_err("create registration"))`
pub fn db_err(context: &'static str) -> impl Fn(DbErr) -> DatabaseError {
    move |e| map_db_err(context, e)
}

/// Status columns are free text in the database; unknown values fall back to
/// the enum default instead of failing the whole query
pub fn parse_column<T>(value: &str, column: &str) -> T
where
    T: std::str::FromStr + Default,
{
    value.parse().unwrap_or_else(|_| {
        tracing::warn!(column, value, "Unrecognised value in status column, using default");
        T::default()
    })
}
