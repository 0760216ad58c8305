//! HTTP client for the abyad API

use abya_common::{
    AnalyzeRequest, AnalyzeResponse, CreateSessionResponse, EvaluationResult, HealthResponse,
    Session, SessionsResponse,
};
use anyhow::{bail, Context, Result};

/// Client for the daemon's evaluation API
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/api/health", self.base_url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach the daemon")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Health request failed ({}): {}", status, text);
        }

        resp.json().await.context("Failed to parse health response")
    }

    pub async fn create_session(&self) -> Result<String> {
        let url = format!("{}/api/create-session", self.base_url);

        let resp = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to reach the daemon")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Create-session request failed ({}): {}", status, text);
        }

        let created: CreateSessionResponse = resp
            .json()
            .await
            .context("Failed to parse create-session response")?;
        if !created.success {
            bail!("Daemon refused to create a session");
        }
        Ok(created.session_id)
    }

    pub async fn analyze(&self, session_id: &str, content: &str) -> Result<EvaluationResult> {
        let url = format!("{}/api/analyze", self.base_url);
        let request = AnalyzeRequest {
            session_id: Some(session_id.to_string()),
            content: Some(content.to_string()),
        };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to reach the daemon")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Analyze request failed ({}): {}", status, text);
        }

        let analyzed: AnalyzeResponse = resp
            .json()
            .await
            .context("Failed to parse analyze response")?;
        Ok(analyzed.results)
    }

    pub async fn sessions(&self) -> Result<Vec<Session>> {
        let url = format!("{}/api/sessions", self.base_url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach the daemon")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Sessions request failed ({}): {}", status, text);
        }

        let listed: SessionsResponse = resp
            .json()
            .await
            .context("Failed to parse sessions response")?;
        Ok(listed.sessions)
    }
}
