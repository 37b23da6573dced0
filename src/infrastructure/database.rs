use crate::infrastructure::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, instrument};

/// Opens the connection pool and applies pending migrations.
///
/// Repositories hold clones of the pool; every query checks a connection
/// out and hands it back when the query future completes or is dropped.
#[instrument(skip_all, fields(max_connections = config.max_connections))]
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
        .context("Failed to connect to database")?;
    info!("Database pool created");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");

    Ok(pool)
}
