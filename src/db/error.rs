use thiserror::Error;

/// Failures raised while reading or writing the persisted list.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to encode todos: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The slot holds something that is not a JSON array of todos.
    #[error("stored todos are not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
}
