//! v003: the vector index, keyed by the entry's internal row identifier
//! (§3.2: "lifetime is tied to the entry's row identifier; clearing entries
//! clears vectors"). `entries.id` is the declared primary key, so its rowid
//! cannot be named in a foreign key; the row-identifier lifetime invariant
//! is instead enforced in `queries::entry_crud` whenever a row is removed.

use rusqlite::Connection;

use memex_core::errors::{MemexResult, StorageError};

pub fn migrate(conn: &Connection) -> MemexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS entry_vectors (
            row_id INTEGER PRIMARY KEY,
            dims   INTEGER NOT NULL,
            vector BLOB NOT NULL
        );
        ",
    )
    .map_err(StorageError::from)?;
    Ok(())
}
