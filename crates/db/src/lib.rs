//! Database layer for schooldesk.

pub mod entities;
pub mod migrations;
pub mod relations;
pub mod repositories;
pub mod test_utils;

use schooldesk_common::{AppError, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Translate a storage error into the application taxonomy.
///
/// `what` names the record being written and ends up in the message.
pub fn map_db_err(what: &str, err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            AppError::Conflict(format!("{what} already exists: {detail}"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            AppError::NotFound(format!("{what} references a missing record: {detail}"))
        }
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_errors_map_to_database() {
        let err = map_db_err("Student", DbErr::Custom("boom".to_string()));
        assert!(matches!(err, AppError::Database(msg) if msg.contains("boom")));
    }

    #[test]
    fn test_record_not_found_maps_to_database() {
        let err = map_db_err("Grade", DbErr::RecordNotFound("grade".to_string()));
        assert!(err.is_server_error());
    }
}
