use advisor_llm::types::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::answer::AnswerStore;

/// Number of recent history turns forwarded to the language collaborator
pub const HISTORY_WINDOW: usize = 10;

/// One conversation turn kept in session history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// All mutable state for one conversation: the answer store, the per-slot
/// retry counters, and the full chat history.
#[derive(Debug, Default)]
pub struct Session {
    pub answers: AnswerStore,
    pub retries: HashMap<String, u32>,
    pub history: Vec<ChatTurn>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent turns, bounded by [`HISTORY_WINDOW`]
    pub fn recent_history(&self) -> &[ChatTurn] {
        let start = self.history.len().saturating_sub(HISTORY_WINDOW);
        &self.history[start..]
    }
}

/// Owner of all sessions, keyed by caller-supplied session id. Each session
/// has its own async mutex so turns within a session are serialized while
/// distinct sessions never contend.
#[derive(Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<String, Arc<tokio::sync::Mutex<Session>>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for `id`, creating an empty one on first use
    pub fn session(&self, id: &str) -> Arc<tokio::sync::Mutex<Session>> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(Session::new())))
            .clone()
    }

    /// Atomically clear the answer store, retry counters, and history for
    /// `id` by swapping in a fresh session under its lock.
    pub async fn reset(&self, id: &str) {
        let session = self.session(id);
        let mut guard = session.lock().await;
        *guard = Session::new();
    }
}
