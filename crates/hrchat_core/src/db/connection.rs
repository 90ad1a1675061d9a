//! Open the HR database.

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use super::layout;
use crate::error::{CoreError, Result};

/// Opens the database for queries. The handle cannot write, so a bad
/// statement from the model cannot alter the store.
pub fn open_read_only(db_path: &Path) -> Result<Connection> {
    if !db_path.exists() {
        return Err(CoreError::MissingDatabase(db_path.display().to_string()));
    }
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.busy_timeout(std::time::Duration::from_millis(5000))?;
    Ok(conn)
}

/// Opens (creating if needed) the database for ingestion.
pub fn open_writable(db_path: &Path) -> Result<Connection> {
    layout::ensure_db_dir(db_path)?;
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_millis(5000))?;
    Ok(conn)
}
