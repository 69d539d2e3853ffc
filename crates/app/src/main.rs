use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use server::completion::CompletionClient;
use server::db::AppState;
use server::storage::S3ObjectStore;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = %e, "server failed");
        eprintln!("estate-intake: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    server::telemetry::init()?;
    server::health::record_start_time();
    server::config::load_feature_flags();
    let flags = server::config::feature_flags();

    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let pool = server::db::create_pool(&database_url)?;
    server::db::run_migrations(&pool).await?;
    tracing::info!("database migrations applied");

    let mut state = AppState::new(pool.clone());

    if flags.s3 {
        match S3ObjectStore::from_env() {
            Ok(store) => {
                store.ensure_bucket().await;
                state.storage = Some(Arc::new(store));
            }
            Err(e) => tracing::warn!(error = %e, "document storage disabled"),
        }
    }

    if flags.summarizer {
        match CompletionClient::from_env() {
            Ok(client) => {
                tracing::info!(model = client.model(), "document summarizer enabled");
                state.completion = Some(Arc::new(client));
            }
            Err(e) => tracing::warn!(error = %e, "document summarizer disabled"),
        }
    }

    tokio::spawn(server::repo::session::purge_expired_loop(
        pool.clone(),
        SESSION_PURGE_INTERVAL,
    ));

    let router = server::openapi::api_router(state)
        .layer(DefaultBodyLimit::max(server::config::max_upload_bytes()))
        .layer(axum::middleware::from_fn_with_state(
            pool,
            server::auth::middleware::auth_middleware,
        ))
        .layer(server::telemetry::http_trace_layer())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer());

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = server::config::env_parse("PORT", 5000);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "estate intake API listening");
    axum::serve(listener, router).await?;
    Ok(())
}

/// Credentialed CORS for the configured frontend origins.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = server::config::cors_allowed_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
