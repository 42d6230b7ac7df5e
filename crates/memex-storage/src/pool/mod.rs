//! Connection pool managing the single writer and the read connection pool.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use memex_core::config::StoreConfig;
use memex_core::errors::MemexResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    pub fn open(path: &Path, read_pool_size: usize, cfg: &StoreConfig) -> MemexResult<Self> {
        let writer = WriteConnection::open(path, cfg)?;
        let readers = ReadPool::open(path, read_pool_size, cfg)?;
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// In-memory mode opens separate `:memory:` databases for writer and
    /// readers, so readers will not see the writer's changes. Tests that
    /// need read-after-write should use a temp file instead.
    pub fn open_in_memory(read_pool_size: usize, cfg: &StoreConfig) -> MemexResult<Self> {
        let writer = WriteConnection::open_in_memory(cfg)?;
        let readers = ReadPool::open_in_memory(read_pool_size, cfg)?;
        Ok(Self {
            writer,
            readers,
            db_path: None,
        })
    }
}
