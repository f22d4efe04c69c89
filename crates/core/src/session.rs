//! The per-session context object.
//!
//! A [`Session`] is created when a user shows up, passed by `&mut` into every
//! interaction, and dropped when the session ends. There is no global state:
//! two sessions never see each other's transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Turn;
use crate::provider::Usage;
use crate::transcript::Transcript;

/// Unique identifier for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user's conversation state for the lifetime of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    transcript: Transcript,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with an empty transcript.
    pub fn new() -> Self {
        Self::with_id(SessionId::new())
    }

    pub fn with_id(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            transcript: Transcript::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Append a completed turn. Only successful exchanges get here.
    pub fn record(&mut self, turn: Turn) {
        self.updated_at = Utc::now();
        self.transcript.push(turn);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// The outcome of one successful question/answer round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    /// The turn that was appended to the transcript
    pub turn: Turn,

    /// Which model actually answered
    pub model: String,

    /// How many earlier turns were sent along with the question
    pub history_turns: usize,

    /// Token usage, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty() {
        let session = Session::new();
        assert!(session.transcript().is_empty());
        assert_eq!(session.created_at(), session.updated_at());
    }

    #[test]
    fn record_appends_and_touches() {
        let mut session = Session::new();
        let created = session.created_at();
        session.record(Turn::new("hi", "hello"));

        assert_eq!(session.transcript().len(), 1);
        assert!(session.updated_at() >= created);
    }

    #[test]
    fn sessions_are_isolated() {
        let mut a = Session::new();
        let b = Session::new();
        a.record(Turn::new("q", "a"));

        assert_ne!(a.id(), b.id());
        assert!(b.transcript().is_empty());
    }

    #[test]
    fn session_id_display() {
        let id = SessionId::from("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.as_str(), "abc");
    }
}
