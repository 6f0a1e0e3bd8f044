//! Domain models that get persisted to local storage and passed throughout the
//! TUI. These types stay light-weight data holders so the store and the view
//! can focus on mutation and presentation.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a to-do record. Serialized as the hyphenated UUID string
/// so the stored JSON stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single entry of the list. `id` and `text` never change after creation;
/// only the completion flag is mutated in place.
pub struct Todo {
    pub id: TodoId,
    /// Text exactly as typed. Callers reject whitespace-only input before a
    /// record is built, but surrounding spaces are kept.
    pub text: String,
    /// Records written without the flag load as open items.
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// Build an open record with a freshly generated id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: TodoId::new(),
            text: text.into(),
            completed: false,
        }
    }

    /// Flip the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

impl fmt::Display for Todo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
