//! Test utilities for database operations.
//!
//! Provides a throwaway database with every migration applied. The default is
//! an in-memory SQLite database, so tests need no external service; set
//! `TEST_DATABASE_URL` to run the same tests against another database.

use std::sync::Arc;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::migrations::Migrator;

/// Default URL for test databases.
pub const SQLITE_MEMORY_URL: &str = "sqlite::memory:";

/// Test database configuration.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database URL.
    pub url: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("TEST_DATABASE_URL")
                .unwrap_or_else(|_| SQLITE_MEMORY_URL.to_string()),
        }
    }
}

impl TestDbConfig {
    /// Whether this points at an in-memory SQLite database.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.url.starts_with("sqlite::memory:")
    }
}

/// A migrated test database.
pub struct TestDatabase {
    /// Database connection, shared with the repositories under test.
    pub conn: Arc<DatabaseConnection>,
    /// Database configuration.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Connect to the default test database and run all migrations.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig::default()).await
    }

    /// Connect with a custom configuration and run all migrations.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(&config.url);
        // Every pooled connection to `sqlite::memory:` is a separate database.
        if config.is_memory() {
            opt.max_connections(1).min_connections(1);
        }
        opt.sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        info!(url = %config.url, "Connected to test database");

        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Shared handle for repositories and services.
    #[must_use]
    pub fn shared(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Remove every row, children before parents.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        let backend = self.conn.get_database_backend();

        for table in [
            "fee_payment",
            "activity_participant",
            "event_target_grade",
            "activity",
            "event",
            "notification",
            "student",
            "staff",
            "grade",
            "id_sequence",
        ] {
            self.conn
                .execute(Statement::from_string(
                    backend,
                    format!("DELETE FROM {table}"),
                ))
                .await?;
        }

        info!("Cleaned up test database");
        Ok(())
    }
}
