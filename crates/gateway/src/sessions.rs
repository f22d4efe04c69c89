//! In-memory session store.
//!
//! A chat holds its session's turn gate for the whole provider call, so a
//! second question on the same session waits for the first; different
//! sessions never contend. The session data itself sits behind a separate
//! lock that is only held while copying in or out, so reading a transcript
//! never waits on a provider.

use chrono::{DateTime, Utc};
use parley_core::session::{Session, SessionId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::info;

/// One live session.
pub struct SessionSlot {
    turn: Mutex<()>,
    session: RwLock<Session>,
}

pub type SessionHandle = Arc<SessionSlot>;

impl SessionSlot {
    fn new(session: Session) -> Self {
        Self {
            turn: Mutex::new(()),
            session: RwLock::new(session),
        }
    }

    /// Wait until no other chat is running on this session.
    pub async fn begin_turn(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }

    /// Copy of the session as of the last completed turn.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Replace the stored session. Call only while holding the turn gate.
    pub async fn commit(&self, session: Session) {
        *self.session.write().await = session;
    }
}

struct Entry {
    created_at: DateTime<Utc>,
    slot: SessionHandle,
}

/// Bounded map of live sessions.
pub struct SessionStore {
    max_sessions: usize,
    sessions: RwLock<HashMap<String, Entry>>,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            max_sessions: max_sessions.max(1),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new, empty session. Evicts the earliest created one when full.
    pub async fn create(&self) -> (SessionId, DateTime<Utc>) {
        let session = Session::new();
        let id = session.id().clone();
        let created_at = session.created_at();

        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.max_sessions {
            if let Some(oldest_key) = sessions
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone())
            {
                sessions.remove(&oldest_key);
                info!(session_id = %oldest_key, "Session store full, evicted oldest session");
            }
        }

        sessions.insert(
            id.to_string(),
            Entry {
                created_at,
                slot: Arc::new(SessionSlot::new(session)),
            },
        );

        (id, created_at)
    }

    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).map(|e| e.slot.clone())
    }

    /// End a session, discarding its transcript. Returns whether it existed.
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
