//! Core library surface for the todo-list TUI application.
//!
//! The binary wires these pieces together; tests and other tooling can reuse
//! the store and repositories without a terminal.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// Runtime settings resolved from the environment.
pub use config::Config;

/// Persistence entry points used by `main.rs` and the integration tests.
pub use db::{ensure_schema, MemoryRepository, SqliteRepository, StorageError, TodoRepository};

/// The record types the store and view pass around.
pub use models::{Todo, TodoId};

/// The list store and what loading it found.
pub use store::{LoadOutcome, TodoStore};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
