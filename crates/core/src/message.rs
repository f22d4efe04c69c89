//! Message and Turn domain types.
//!
//! A [`Turn`] is what the user sees: one question and the answer it got.
//! A [`Message`] is what the provider sees: a role-tagged piece of text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions supplied with the request
    System,
    /// The human asking questions
    User,
    /// The model's reply
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single role-tagged entry of an outbound message sequence.
///
/// Carries no ids or timestamps, so two sequences built from the same
/// inputs compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content, verbatim
    pub content: String,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One human question paired with one assistant answer.
///
/// Immutable once created: fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    human: String,
    assistant: String,
    created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with the current time.
    pub fn new(human: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            human: human.into(),
            assistant: assistant.into(),
            created_at: Utc::now(),
        }
    }

    pub fn human(&self) -> &str {
        &self.human
    }

    pub fn assistant(&self) -> &str {
        &self.assistant
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The two provider messages this turn stands for, question first.
    pub fn to_messages(&self) -> [Message; 2] {
        [
            Message::user(self.human.as_str()),
            Message::assistant(self.assistant.as_str()),
        ]
    }
}
