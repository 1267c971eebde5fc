//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! # Apply every pending migration
//! certdesk migrate
//!
//! # Show which migrations would run
//! certdesk migrate --dry-run
//! ```
//!
//! # Environment Variables
//!
//! The connection settings are the server's own: `CERTDESK_DATABASE_URL`
//! (or `DATABASE_URL`), else `CERTDESK_DB_HOST`, `CERTDESK_DB_PORT`,
//! `CERTDESK_DB_USER`, `CERTDESK_DB_PASSWORD` and `CERTDESK_DB_NAME`.
//!
//! # Migration Files
//!
//! Migrations live in `crates/server/migrations/` and are embedded at build
//! time.

use std::collections::HashSet;

use certdesk_server::config::{ConfigError, DatabaseConfig};
use certdesk_server::store::postgres::create_pool;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use thiserror::Error;

static MIGRATOR: Migrator = sqlx::migrate!("../server/migrations");

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Database settings could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply every pending migration.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running certdesk migrations...");
    MIGRATOR.run(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations complete!");
    Ok(())
}

/// Log each embedded migration and whether it has been applied.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable.
pub async fn pending() -> Result<(), MigrationError> {
    let pool = connect().await?;
    let applied = applied_versions(&pool).await?;
    pool.close().await;

    let mut pending = 0_usize;
    for migration in MIGRATOR.iter() {
        if applied.contains(&migration.version) {
            tracing::info!(version = migration.version, "applied: {}", migration.description);
        } else {
            pending += 1;
            tracing::info!(version = migration.version, "pending: {}", migration.description);
        }
    }

    tracing::info!("{pending} pending migration(s)");
    Ok(())
}

async fn connect() -> Result<PgPool, MigrationError> {
    let config = DatabaseConfig::from_env()?;

    tracing::info!("Connecting to certdesk database...");
    Ok(create_pool(&config).await?)
}

/// Versions recorded by sqlx as successfully applied.
///
/// An empty set if migrations have never run against this database.
async fn applied_versions(pool: &PgPool) -> Result<HashSet<i64>, sqlx::Error> {
    let tracked: bool =
        sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;
    if !tracked {
        return Ok(HashSet::new());
    }

    let versions: Vec<i64> =
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(pool)
            .await?;
    Ok(versions.into_iter().collect())
}
