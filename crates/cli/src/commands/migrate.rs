//! Database migration command.
//!
//! ```bash
//! sf-cli migrate
//! ```
//!
//! Applies `crates/api/migrations/` to the `PostgreSQL` database named by
//! `SHOPFRONT_DATABASE_URL`. The in-memory backend has nothing to migrate.

use shopfront_api::config::{ApiConfig, ConfigError, StoreBackend};
use shopfront_api::db::postgres::create_pool;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("migrations require a postgres:// database URL")]
    NotPostgres,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run document store migrations.
///
/// # Errors
///
/// Returns `MigrationError` if configuration is missing, the URL is not a
/// `PostgreSQL` URL, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let config = ApiConfig::from_env()?;
    if config.store_backend != StoreBackend::Postgres {
        return Err(MigrationError::NotPostgres);
    }

    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
