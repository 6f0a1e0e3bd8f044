//! Persistence module split across logical submodules.

mod connection;
mod error;
mod repository;
mod slots;

pub use connection::{ensure_schema, open_in_memory};
pub use error::StorageError;
pub use repository::{MemoryRepository, SqliteRepository, TodoRepository, TODOS_KEY};
pub use slots::{get_item, remove_item, set_item};
