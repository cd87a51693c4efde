//! Database Connection and Setup
//!
//! Opens the SQLite database and runs migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    conn: Arc<Mutex<Connection>>,
}

impl DbState {
    /// Shared handle to the connection
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }
}

/// Initialize database at path (`:memory:` for a throwaway database)
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Internal(format!("Failed to open db: {}", e)))?;

    run_migrations(&conn)?;
    log::info!("database ready at {}", db_path.display());

    Ok(DbState {
        conn: Arc::new(Mutex::new(conn)),
    })
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(names) = stmt.query_map([], |row| row.get::<_, String>(1)) else {
        return false;
    };
    let found = names.flatten().any(|name| name == column);
    found
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL,
            is_completed INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    // Added after the first release
    if !column_exists(conn, "todos", "created_at") {
        conn.execute(
            "ALTER TABLE todos ADD COLUMN created_at INTEGER NOT NULL DEFAULT 0",
            [],
        )
        .map_err(|e| DomainError::Internal(format!("Failed to add created_at: {}", e)))?;
    }

    // Commit counter; one row
    conn.execute(
        "CREATE TABLE IF NOT EXISTS sync_meta (
            key TEXT PRIMARY KEY,
            value INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    conn.execute(
        "INSERT OR IGNORE INTO sync_meta (key, value) VALUES ('version', 0)",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    // Tokens of the latest commits, echoed in snapshots
    conn.execute(
        "CREATE TABLE IF NOT EXISTS commit_log (
            version INTEGER PRIMARY KEY,
            client TEXT NOT NULL,
            seq INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    // Client ids are only unique within one run
    conn.execute("DELETE FROM commit_log", [])
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok(())
}
