//! The conversation history of one session.

use crate::types::{GenerateContentRequest, Turn};

/// An ordered, append-only list of turns, oldest first.
///
/// The only removal is [`History::rollback_user_turn`], which undoes a user turn
/// whose request failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn.  Turns without parts are never committed.
    pub fn push(&mut self, turn: Turn) {
        debug_assert!(!turn.parts.is_empty());
        self.turns.push(turn);
    }

    /// Removes the most recent turn if, and only if, it belongs to the user.
    pub fn rollback_user_turn(&mut self) -> Option<Turn> {
        if self.turns.last().is_some_and(Turn::is_user) {
            self.turns.pop()
        } else {
            None
        }
    }

    /// Every turn, in chronological order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Returns the number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if no turn has been committed.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drops every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// The request payload for the whole conversation.
    pub fn request(&self) -> GenerateContentRequest {
        GenerateContentRequest::from_history(&self.turns)
    }
}
