//! Request and response types for the daemon's HTTP API.
//!
//! Every response body carries a `success` flag; failures use
//! `ErrorResponse` with the same flag set to false.

use crate::evaluation::EvaluationResult;
use serde::{Deserialize, Serialize};

/// A tracked evaluation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub status: String,
    pub created_at: String,
}

/// Body of POST /api/analyze. Fields are optional so that incomplete
/// requests reach the handler's own validation instead of the JSON
/// decoder's.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub success: bool,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub results: EvaluationResult,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub success: bool,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub active_sessions: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
