//! API routes for abyad

use crate::server::{AppState, SERVICE_NAME};
use crate::workflow;
use abya_common::{
    AnalyzeRequest, AnalyzeResponse, CreateSessionResponse, ErrorResponse, HealthResponse,
    SessionsResponse,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info};

type AppStateArc = Arc<AppState>;

/// Generic analyze failure message. Root causes stay in the server log;
/// clients only see this.
const ANALYZE_FAILED: &str = "Failed to analyze course content using the deployed workflow";

/// API failure that renders as the `{"success": false, "error": ...}`
/// envelope with the given status code.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            success: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

// ============================================================================
// Session Routes
// ============================================================================

pub fn session_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/create-session", post(create_session))
        .route("/api/sessions", get(list_sessions))
}

async fn create_session(State(state): State<AppStateArc>) -> Json<CreateSessionResponse> {
    let session = state.sessions.create().await;
    info!("  Created session: {}", session.id);

    Json(CreateSessionResponse {
        success: true,
        session_id: session.id,
    })
}

async fn list_sessions(State(state): State<AppStateArc>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        success: true,
        sessions: state.sessions.list().await,
    })
}

// ============================================================================
// Analyze Routes
// ============================================================================

pub fn analyze_routes() -> Router<AppStateArc> {
    Router::new().route("/api/analyze", post(analyze_course))
}

async fn analyze_course(
    State(state): State<AppStateArc>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    // An undecodable body gets the error envelope, not axum's plain text.
    let Json(req) = body.map_err(|e| {
        error!("  Analyze request body rejected: {}", e);
        ApiError::bad_request("Invalid request body")
    })?;

    let session_id = req.session_id.unwrap_or_default();
    let content = req.content.unwrap_or_default();
    if session_id.is_empty() || content.is_empty() {
        return Err(ApiError::bad_request("Missing session_id or content"));
    }

    let guard = state.sessions.analyze_guard(&session_id).await.ok_or_else(|| {
        error!("  Unknown session: {}", session_id);
        ApiError::bad_request("Invalid session_id")
    })?;

    // One analyze at a time per session; other sessions are unaffected.
    let _serialized = guard.lock().await;

    info!("  Analyzing course content for session: {}", session_id);
    match workflow::analyze(&state.runner, &content).await {
        Ok(results) => Ok(Json(AnalyzeResponse {
            success: true,
            results,
        })),
        Err(e) => {
            error!("  Analysis failed for session {}: {}", session_id, e);
            Err(ApiError::internal(ANALYZE_FAILED))
        }
    }
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/api/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        active_sessions: state.sessions.count().await,
    })
}
