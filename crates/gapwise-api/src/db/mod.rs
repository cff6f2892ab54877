//! # Database Persistence
//!
//! PostgreSQL write-through for submissions, the risk register and the
//! audit log. The in-memory stores in [`crate::state`] remain the read
//! path; the database survives restarts and is loaded back by
//! [`crate::state::AppState::hydrate_from_db`].
//!
//! Persistence is optional. Without `DATABASE_URL` the service runs
//! in-memory only.

pub mod audit;
pub mod risks;
pub mod submissions;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connect to PostgreSQL and run embedded migrations.
///
/// Returns `Ok(None)` when `DATABASE_URL` is not set.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            tracing::warn!("DATABASE_URL not set; running with in-memory storage only");
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database connected and migrations applied");

    Ok(Some(pool))
}

/// Map a JSON (de)serialization failure into the sqlx error space.
pub(crate) fn json_error(context: &str, err: serde_json::Error) -> sqlx::Error {
    sqlx::Error::Protocol(format!("{context}: {err}"))
}
