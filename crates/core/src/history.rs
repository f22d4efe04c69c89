//! Bounded view over a transcript.
//!
//! The window owns no state of its own: it is recomputed from the
//! transcript on every request.

use crate::message::{Message, Turn};
use crate::transcript::Transcript;

/// The most recent `k` turns of a transcript, oldest first.
///
/// Always a contiguous suffix of the transcript it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow<'a> {
    turns: &'a [Turn],
}

impl<'a> HistoryWindow<'a> {
    /// A window with no turns in it.
    pub fn empty() -> Self {
        Self { turns: &[] }
    }

    /// Number of turns in the window.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &'a [Turn] {
        self.turns
    }

    /// Number of provider messages the window expands to.
    pub fn message_count(&self) -> usize {
        self.turns.len() * 2
    }

    /// Alternating user/assistant messages in chronological order.
    pub fn messages(&self) -> impl Iterator<Item = Message> + 'a {
        self.turns.iter().flat_map(Turn::to_messages)
    }
}

/// Take the last `k` turns of `transcript`.
///
/// Returns the whole transcript when it is shorter than `k`.
pub fn rehydrate(transcript: &Transcript, k: usize) -> HistoryWindow<'_> {
    let turns = transcript.turns();
    let start = turns.len().saturating_sub(k);
    HistoryWindow {
        turns: &turns[start..],
    }
}
