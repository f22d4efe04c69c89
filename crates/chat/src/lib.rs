//! The question-answer cycle — what happens each time the user asks something.
//!
//! 1. **Rehydrate** the last `k` turns from the session transcript
//! 2. **Assemble** system prompt + history + new question
//! 3. **Complete** the sequence with the configured provider
//! 4. **Record** the new turn, only if the provider answered
//!
//! Presenters (HTTP gateway, terminal) own the [`Session`](parley_core::Session)
//! and hand it in by `&mut` for the duration of one call.

pub mod engine;

#[cfg(test)]
mod test_helpers;

pub use engine::ChatEngine;
