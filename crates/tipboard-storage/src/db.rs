use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open or create the database, run migrations
pub fn open_db(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("opening database {}", path.display()))?;
    migrate(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (useful for testing)
pub fn open_memory_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrate(&conn)?;
    Ok(conn)
}

fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
    ",
    )?;
    Ok(())
}
