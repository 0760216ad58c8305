//! In-memory session registry.
//!
//! Analyze calls for one session serialize on that session's guard;
//! distinct sessions proceed in parallel. Records live for the process
//! lifetime; nothing is persisted.

use abya_common::Session;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Status assigned to freshly created sessions.
const STATUS_ACTIVE: &str = "active";

struct SessionEntry {
    record: Session,
    analyze_guard: Arc<Mutex<()>>,
}

/// Session registry shared through `AppState`.
pub struct SessionStore {
    entries: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session and return its public record.
    pub async fn create(&self) -> Session {
        let record = Session {
            id: Uuid::new_v4().to_string(),
            status: STATUS_ACTIVE.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        let entry = SessionEntry {
            record: record.clone(),
            analyze_guard: Arc::new(Mutex::new(())),
        };
        self.entries.write().await.insert(record.id.clone(), entry);
        record
    }

    /// Analyze guard for a session, or None when the id is unknown.
    pub async fn analyze_guard(&self, id: &str) -> Option<Arc<Mutex<()>>> {
        self.entries
            .read()
            .await
            .get(id)
            .map(|e| e.analyze_guard.clone())
    }

    /// All session records, oldest first.
    pub async fn list(&self) -> Vec<Session> {
        let entries = self.entries.read().await;
        let mut sessions: Vec<Session> = entries.values().map(|e| e.record.clone()).collect();
        sessions.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        sessions
    }

    /// Number of tracked sessions.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
