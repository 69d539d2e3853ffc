use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;

use crate::db::AppState;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the application start time. Call once during startup.
pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Liveness plus the state of each backing service.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: String,
    pub db: String,
    /// Whether document upload/download is wired to a bucket.
    pub document_storage: bool,
    /// Whether document summaries can be requested.
    pub summarizer: bool,
    pub uptime_seconds: u64,
    pub version: String,
}

fn overall_status(db_ok: bool) -> &'static str {
    if db_ok {
        "ok"
    } else {
        "degraded"
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service status; `degraded` when the database is unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await;
    if let Err(e) = &db {
        tracing::warn!(error = %e, "health check could not reach the database");
    }

    Json(HealthResponse {
        status: overall_status(db.is_ok()).to_string(),
        db: match db {
            Ok(_) => "connected".to_string(),
            Err(e) => format!("error: {e}"),
        },
        document_storage: state.storage.is_some(),
        summarizer: state.completion.is_some(),
        uptime_seconds: START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
