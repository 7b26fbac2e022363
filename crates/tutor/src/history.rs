//! Rolling conversation history for the explanation pipeline.

use bridgetutor_core::message::Message;
use serde::{Deserialize, Serialize};

/// How many of the most recent turns are replayed to the model.
///
/// Four turns are two question/answer exchanges.
pub const CONTEXT_WINDOW_TURNS: usize = 4;

/// Append-only list of user/assistant turns.
///
/// Only complete exchanges are recorded, so the history always alternates
/// user, assistant, user, assistant...
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished exchange: the question first, then the answer.
    pub fn record_exchange(&mut self, query: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Message::user(query));
        self.turns.push(Message::assistant(answer));
    }

    /// The most recent [`CONTEXT_WINDOW_TURNS`] turns, oldest first.
    pub fn window(&self) -> &[Message] {
        let start = self.turns.len().saturating_sub(CONTEXT_WINDOW_TURNS);
        &self.turns[start..]
    }

    /// Every recorded turn, oldest first.
    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
