//! Command implementations for abyactl

use crate::client::ApiClient;
use crate::render;
use abya_common::compute;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub async fn health(url: &str) -> Result<()> {
    let health = ApiClient::new(url).health().await?;
    println!(
        "{} - {} v{} (uptime {}s, {} active sessions)",
        health.status, health.service, health.version, health.uptime_seconds,
        health.active_sessions
    );
    Ok(())
}

pub async fn create_session(url: &str) -> Result<()> {
    let session_id = ApiClient::new(url).create_session().await?;
    println!("{}", session_id);
    Ok(())
}

pub async fn sessions(url: &str) -> Result<()> {
    let sessions = ApiClient::new(url).sessions().await?;
    if sessions.is_empty() {
        println!("No active sessions");
        return Ok(());
    }
    for session in sessions {
        println!("{}  {}  {}", session.id, session.status, session.created_at);
    }
    Ok(())
}

pub async fn analyze(url: &str, file: &Path, session: Option<String>) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let client = ApiClient::new(url);
    let session_id = match session {
        Some(id) => id,
        None => client.create_session().await?,
    };

    println!("Session: {}", session_id);
    println!("Submitting course content ({} bytes)...", content.len());

    let results = client.analyze(&session_id, &content).await?;
    render::evaluation(&results);
    Ok(())
}

/// Run the local scorer on a grade map, no daemon involved. Useful for
/// re-checking a pipeline verdict by hand.
pub fn score(category: &str, scores_path: &Path) -> Result<()> {
    let raw = fs::read_to_string(scores_path)
        .with_context(|| format!("Failed to read {}", scores_path.display()))?;
    let scores: BTreeMap<String, u32> = serde_json::from_str(&raw)
        .context("Scores file must map element names to integers in 0-100")?;

    let result = compute(category, &scores)?;
    render::evaluation(&result);
    Ok(())
}
