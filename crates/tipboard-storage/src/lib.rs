pub mod db;
pub mod kv;

// Re-export key types for convenience
pub use db::{open_db, open_memory_db};
pub use kv::SqliteStorage;

use anyhow::Result;
use std::path::Path;

/// Open the database at `path` as board storage.
pub fn open_storage(path: &Path) -> Result<SqliteStorage> {
    Ok(SqliteStorage::new(open_db(path)?))
}
