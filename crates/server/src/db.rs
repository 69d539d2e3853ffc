use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::completion::CompletionClient;
use crate::storage::S3ObjectStore;

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract `State<PgPool>` directly.
///
/// `storage` and `completion` are `None` when their feature flag is off or
/// their configuration is missing; the document endpoints answer 503 then.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub storage: Option<Arc<S3ObjectStore>>,
    pub completion: Option<Arc<CompletionClient>>,
}

impl AppState {
    /// State with only the database configured.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            storage: None,
            completion: None,
        }
    }
}

/// Create a new database connection pool.
/// Uses `connect_lazy` so no connections open until the first query.
pub fn create_pool(database_url: &str) -> Result<Pool<Postgres>, sqlx::Error> {
    let max_connections: u32 = crate::config::env_parse("DATABASE_MAX_CONNECTIONS", 10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(database_url)
}

/// Run database migrations against the given pool.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
