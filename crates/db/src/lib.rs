//! Persistence layer for Verdict.
//!
//! `models/` holds `FromRow` entity structs and create DTOs; `repositories/`
//! holds zero-sized repo structs whose async methods take `&PgPool` as the
//! first argument. The engine owns only the `triage_overrides` table; the
//! annotation tables are read-mostly and populated by ingestion.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Shared connection pool type used across the workspace.
pub type DbPool = PgPool;

/// Create a connection pool for the given database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Verify the database is reachable with a trivial round trip.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
