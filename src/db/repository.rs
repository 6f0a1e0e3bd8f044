//! Load/save seam between the store and wherever the list actually lives.
//! The store only ever sees a `TodoRepository`, so tests swap the SQLite slot
//! for an in-memory one without touching store code.

use std::cell::RefCell;
use std::rc::Rc;

use rusqlite::Connection;
use tracing::debug;

use super::error::StorageError;
use super::slots::{get_item, set_item};
use crate::models::Todo;

/// Storage key holding the JSON-encoded list.
pub const TODOS_KEY: &str = "todos";

/// Persistence contract for the whole list. Implementations store the full
/// sequence on every save; there is no partial update.
pub trait TodoRepository {
    /// Read the persisted list. A slot that was never written yields an empty
    /// list; unreadable content yields `StorageError::Malformed`.
    fn load(&self) -> Result<Vec<Todo>, StorageError>;

    /// Replace the persisted list with `todos`.
    fn save(&mut self, todos: &[Todo]) -> Result<(), StorageError>;
}

fn decode(raw: Option<String>) -> Result<Vec<Todo>, StorageError> {
    match raw {
        Some(json) => serde_json::from_str(&json).map_err(StorageError::Malformed),
        None => Ok(Vec::new()),
    }
}

fn encode(todos: &[Todo]) -> Result<String, StorageError> {
    serde_json::to_string(todos).map_err(StorageError::Serialize)
}

/// Durable repository backed by the `local_storage` table.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Take ownership of a connection whose schema is already in place.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Underlying connection, for direct slot access.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TodoRepository for SqliteRepository {
    fn load(&self) -> Result<Vec<Todo>, StorageError> {
        let todos = decode(get_item(&self.conn, TODOS_KEY)?)?;
        debug!(count = todos.len(), "loaded todos from sqlite");
        Ok(todos)
    }

    fn save(&mut self, todos: &[Todo]) -> Result<(), StorageError> {
        set_item(&self.conn, TODOS_KEY, &encode(todos)?)?;
        debug!(count = todos.len(), "saved todos to sqlite");
        Ok(())
    }
}

/// In-memory slot holding the same JSON text the SQLite table would. Clones
/// share the slot, so a second store built from a clone sees what the first
/// one saved, the way a page reload sees local storage.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryRepository {
    /// Start with `raw` already in the slot, well-formed or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(raw.into()))),
        }
    }

    /// Current slot contents.
    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl TodoRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<Todo>, StorageError> {
        decode(self.raw())
    }

    fn save(&mut self, todos: &[Todo]) -> Result<(), StorageError> {
        let json = encode(todos)?;
        *self.slot.borrow_mut() = Some(json);
        Ok(())
    }
}
