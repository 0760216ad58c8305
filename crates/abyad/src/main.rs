//! ABYA Course Reviewer daemon
//!
//! Serves the evaluation API and shells out to the deployed agent
//! pipeline for the actual grading.

use abyad::config::Config;
use abyad::server::{self, AppState};
use anyhow::Result;
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("abyad v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    if config.runner.cmd.is_empty() {
        warn!("No runner command configured; analyze requests will fail until [runner] cmd is set");
    }

    let state = AppState::new(&config);
    server::run(&config, state).await
}
