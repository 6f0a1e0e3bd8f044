use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

/// Ensure the database file exists, create the slot table if needed, and
/// return a live connection. Parent directories are created on demand so a
/// fresh install only needs a writable home directory.
pub fn ensure_schema(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(db_path).context("failed to open SQLite database")?;
    create_slot_table(&conn)?;
    debug!(path = %db_path.display(), "storage ready");

    Ok(conn)
}

/// Fresh in-memory database with the same schema. Nothing survives the
/// connection, which is exactly what tests want.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    create_slot_table(&conn)?;
    Ok(conn)
}

/// One row per storage key. Values are opaque strings, JSON in practice.
fn create_slot_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS local_storage (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create local_storage table")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_schema_creates_missing_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.sqlite");

        let conn = ensure_schema(&path).unwrap();

        assert!(path.exists());
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'local_storage'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("storage.sqlite");

        drop(ensure_schema(&path).unwrap());
        assert!(ensure_schema(&path).is_ok());
    }
}
