//! Todo Repository Implementation
//!
//! SQLite-backed implementation of Repository<Todo> and VersionedRepository<Todo>.
//! The row helpers take a plain `&Connection` so they run the same inside
//! a commit transaction.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::traits::{Repository, VersionedRepository};
use crate::domain::{DomainError, DomainResult, Todo, TodoId};
use todo_sync::{ClientId, MutationToken, Snapshot, COMMIT_LOG_LEN};

const TODO_COLUMNS: &str = "id, text, is_completed, created_at";

/// SQLite implementation of Todo repository
#[derive(Clone)]
pub struct TodoRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TodoRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

fn internal(e: rusqlite::Error) -> DomainError {
    DomainError::Internal(e.to_string())
}

/// Convert a database row to Todo
fn row_to_todo(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: TodoId(row.get::<_, i64>(0)? as u64),
        text: row.get(1)?,
        is_completed: row.get(2)?,
        created_at: row.get(3)?,
    })
}

// ========================
// Row helpers
// ========================

pub(crate) fn insert_todo(conn: &Connection, todo: &Todo) -> DomainResult<Todo> {
    conn.execute(
        "INSERT INTO todos (text, is_completed, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![todo.text, todo.is_completed, todo.created_at],
    )
    .map_err(internal)?;

    let mut created = todo.clone();
    created.id = TodoId(conn.last_insert_rowid() as u64);
    Ok(created)
}

pub(crate) fn find_todo(conn: &Connection, id: TodoId) -> DomainResult<Option<Todo>> {
    conn.query_row(
        &format!("SELECT {} FROM todos WHERE id = ?1", TODO_COLUMNS),
        [id.0 as i64],
        row_to_todo,
    )
    .optional()
    .map_err(internal)
}

pub(crate) fn update_todo(conn: &Connection, todo: &Todo) -> DomainResult<()> {
    let changed = conn
        .execute(
            "UPDATE todos SET text = ?1, is_completed = ?2 WHERE id = ?3",
            rusqlite::params![todo.text, todo.is_completed, todo.id.0 as i64],
        )
        .map_err(internal)?;

    if changed == 0 {
        return Err(DomainError::NotFound(todo.id));
    }
    Ok(())
}

pub(crate) fn delete_todo(conn: &Connection, id: TodoId) -> DomainResult<()> {
    let changed = conn
        .execute("DELETE FROM todos WHERE id = ?1", [id.0 as i64])
        .map_err(internal)?;

    if changed == 0 {
        return Err(DomainError::NotFound(id));
    }
    Ok(())
}

fn list_todos(conn: &Connection) -> DomainResult<Vec<Todo>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {} FROM todos ORDER BY id ASC", TODO_COLUMNS))
        .map_err(internal)?;
    let todos = stmt
        .query_map([], row_to_todo)
        .map_err(internal)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(internal)?;
    Ok(todos)
}

fn read_version(conn: &Connection) -> DomainResult<u64> {
    let version: i64 = conn
        .query_row("SELECT value FROM sync_meta WHERE key = 'version'", [], |row| row.get(0))
        .map_err(internal)?;
    Ok(version as u64)
}

/// Tokens of the retained commits, oldest first
fn read_applied(conn: &Connection) -> DomainResult<Vec<MutationToken>> {
    let mut stmt = conn
        .prepare("SELECT client, seq FROM commit_log ORDER BY version ASC")
        .map_err(internal)?;
    let applied = stmt
        .query_map([], |row| {
            Ok(MutationToken::new(ClientId(row.get(0)?), row.get::<_, i64>(1)? as u64))
        })
        .map_err(internal)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(internal)?;
    Ok(applied)
}

fn read_snapshot(conn: &Connection) -> DomainResult<Snapshot> {
    let version = read_version(conn)?;
    let todos = list_todos(conn)?;
    Ok(Snapshot::new(version, todos).with_applied(read_applied(conn)?))
}

#[async_trait]
impl Repository<Todo> for TodoRepository {
    async fn create(&self, entity: &Todo) -> DomainResult<Todo> {
        let conn = self.conn.lock().await;
        insert_todo(&conn, entity)
    }

    async fn find_by_id(&self, id: TodoId) -> DomainResult<Option<Todo>> {
        let conn = self.conn.lock().await;
        find_todo(&conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<Todo>> {
        let conn = self.conn.lock().await;
        list_todos(&conn)
    }

    async fn update(&self, entity: &Todo) -> DomainResult<Todo> {
        let conn = self.conn.lock().await;
        update_todo(&conn, entity)?;
        Ok(entity.clone())
    }

    async fn delete(&self, id: TodoId) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        delete_todo(&conn, id)
    }
}

#[async_trait]
impl VersionedRepository<Todo> for TodoRepository {
    async fn current_version(&self) -> DomainResult<u64> {
        let conn = self.conn.lock().await;
        read_version(&conn)
    }

    async fn snapshot(&self) -> DomainResult<Snapshot> {
        let conn = self.conn.lock().await;
        read_snapshot(&conn)
    }

    async fn commit<F>(&self, token: &MutationToken, write: F) -> DomainResult<Snapshot>
    where
        F: FnOnce(&Connection) -> DomainResult<()> + Send,
    {
        let mut conn = self.conn.lock().await;
        // Dropping `tx` without commit rolls everything back
        let tx = conn.transaction().map_err(internal)?;

        write(&*tx)?;
        tx.execute("UPDATE sync_meta SET value = value + 1 WHERE key = 'version'", [])
            .map_err(internal)?;
        let version = read_version(&tx)?;
        tx.execute(
            "INSERT INTO commit_log (version, client, seq) VALUES (?1, ?2, ?3)",
            rusqlite::params![version as i64, token.client.0, token.seq as i64],
        )
        .map_err(internal)?;
        tx.execute(
            "DELETE FROM commit_log WHERE version <= ?1",
            [version as i64 - COMMIT_LOG_LEN as i64],
        )
        .map_err(internal)?;

        let snapshot = read_snapshot(&tx)?;
        tx.commit().map_err(internal)?;
        Ok(snapshot)
    }
}
