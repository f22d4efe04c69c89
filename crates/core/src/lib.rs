//! # Parley Core
//!
//! Domain types, traits, and error definitions for the Parley chat interface.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The conversation state is an explicit [`Session`] value owned by whoever
//! presents it (the HTTP gateway or the terminal). Each request derives a
//! bounded [`HistoryWindow`] from the session's [`Transcript`], assembles the
//! outbound messages with [`prompt::build`], and hands them to a [`Provider`].
//! Nothing in here performs I/O.

pub mod error;
pub mod history;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod settings;
pub mod transcript;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result};
pub use history::{HistoryWindow, rehydrate};
pub use message::{Message, Role, Turn};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use session::{Exchange, Session, SessionId};
pub use settings::{ChatSettings, ModelId, WindowSize};
pub use transcript::Transcript;
