//! The single writer connection (§4.1, §5 "Store is opened by exactly one
//! writer per process").

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use memex_core::config::StoreConfig;
use memex_core::errors::{MemexResult, StorageError};

use super::pragmas::apply_pragmas;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, cfg: &StoreConfig) -> MemexResult<Self> {
        let conn = Connection::open(path).map_err(StorageError::from)?;
        apply_pragmas(&conn, cfg)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory(cfg: &StoreConfig) -> MemexResult<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        apply_pragmas(&conn, cfg)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` against the writer connection. Named to match the single
    /// serialisation point every mutating query goes through (§5: "no
    /// operation that mutates the Store may interleave with another such
    /// operation in the same process").
    pub fn with_conn_sync<F, T>(&self, f: F) -> MemexResult<T>
    where
        F: FnOnce(&Connection) -> MemexResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| StorageError::Corrupted {
                details: format!("writer lock poisoned: {e}"),
            })?;
        f(&guard)
    }
}
