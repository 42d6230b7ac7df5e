//! PRAGMA configuration applied to every connection (§4.1 durability).
//!
//! WAL mode, NORMAL sync, configurable mmap/cache sizes, a 5s busy_timeout,
//! foreign_keys ON, incremental auto_vacuum.

use rusqlite::Connection;

use memex_core::config::StoreConfig;
use memex_core::errors::{MemexResult, StorageError};

/// Apply all performance and safety pragmas to a writer connection.
pub fn apply_pragmas(conn: &Connection, cfg: &StoreConfig) -> MemexResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA mmap_size = {mmap};
        PRAGMA cache_size = {cache};
        PRAGMA busy_timeout = {busy};
        PRAGMA foreign_keys = ON;
        PRAGMA auto_vacuum = INCREMENTAL;
        ",
        mmap = cfg.mmap_size_bytes,
        cache = cfg.cache_size_kib,
        busy = cfg.busy_timeout_ms,
    ))
    .map_err(StorageError::from)?;
    Ok(())
}

/// Read connections only need busy_timeout and foreign_keys; WAL/mmap are
/// process-wide once the writer has set them.
pub fn apply_read_pragmas(conn: &Connection, cfg: &StoreConfig) -> MemexResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA busy_timeout = {busy};
        PRAGMA foreign_keys = ON;
        ",
        busy = cfg.busy_timeout_ms,
    ))
    .map_err(StorageError::from)?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> MemexResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(StorageError::from)?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
