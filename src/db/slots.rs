use rusqlite::{params, Connection, OptionalExtension};

use super::error::StorageError;

/// Read the value stored under `key`, or `None` when the slot was never
/// written.
pub fn get_item(conn: &Connection, key: &str) -> Result<Option<String>, StorageError> {
    let value = conn
        .query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Write `value` under `key`, replacing whatever was there.
pub fn set_item(conn: &Connection, key: &str, value: &str) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Drop the slot. Returns whether anything was removed.
pub fn remove_item(conn: &Connection, key: &str) -> Result<bool, StorageError> {
    let deleted = conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
    Ok(deleted > 0)
}
