//! HTTP server for abyad

use crate::config::Config;
use crate::routes;
use crate::runner::WorkflowRunner;
use crate::sessions::SessionStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "ABYA Course Reviewer";

/// Application state shared across handlers
pub struct AppState {
    pub sessions: SessionStore,
    pub runner: WorkflowRunner,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            sessions: SessionStore::new(),
            runner: WorkflowRunner::new(&config.runner),
            start_time: Instant::now(),
        }
    }
}

/// Build the full API router for the given shared state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::session_routes())
        .merge(routes::analyze_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Browser demo clients are served from another origin
        .layer(CorsLayer::permissive())
}

/// Run the HTTP server
pub async fn run(config: &Config, state: AppState) -> Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    info!("  Listening on http://{}", config.server.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
