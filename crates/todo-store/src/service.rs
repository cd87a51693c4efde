//! Todo Service
//!
//! The authoritative side of the live query: each write runs in one
//! transaction with its version bump, and the resulting snapshot is
//! published to every client before the receipt is returned.

use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{new_todo, DomainError, DomainResult, NonEmptyText, TodoId};
use crate::repository::{
    delete_todo, find_todo, insert_todo, update_todo, TodoRepository, VersionedRepository,
};
use todo_sync::{CommitReceipt, MutationToken, Snapshot};

/// Receives every snapshot produced by a committed write
pub trait SnapshotSink: Send + Sync {
    fn publish(&self, snapshot: &Snapshot);
}

pub struct TodoService {
    repo: TodoRepository,
    sink: Arc<dyn SnapshotSink>,
    /// Keeps publishes in commit order
    commit_lock: Mutex<()>,
}

impl TodoService {
    pub fn new(repo: TodoRepository, sink: Arc<dyn SnapshotSink>) -> Self {
        Self {
            repo,
            sink,
            commit_lock: Mutex::new(()),
        }
    }

    /// Current result of the "all todos" query
    pub async fn snapshot(&self) -> DomainResult<Snapshot> {
        self.repo.snapshot().await
    }

    pub async fn add(&self, token: MutationToken, text: String) -> DomainResult<CommitReceipt> {
        let todo = new_todo(&NonEmptyText::parse(text)?);
        self.commit(&token, move |conn| {
            let created = insert_todo(conn, &todo)?;
            log::info!("added todo {}", created.id);
            Ok(())
        })
        .await
    }

    pub async fn toggle(&self, token: MutationToken, id: TodoId) -> DomainResult<CommitReceipt> {
        self.commit(&token, move |conn| {
            let mut todo = find_todo(conn, id)?.ok_or(DomainError::NotFound(id))?;
            todo.is_completed = !todo.is_completed;
            update_todo(conn, &todo)?;
            log::info!("toggled todo {} -> {}", id, todo.is_completed);
            Ok(())
        })
        .await
    }

    pub async fn remove(&self, token: MutationToken, id: TodoId) -> DomainResult<CommitReceipt> {
        self.commit(&token, move |conn| {
            delete_todo(conn, id)?;
            log::info!("removed todo {}", id);
            Ok(())
        })
        .await
    }

    async fn commit<F>(&self, token: &MutationToken, write: F) -> DomainResult<CommitReceipt>
    where
        F: FnOnce(&Connection) -> DomainResult<()> + Send,
    {
        let _guard = self.commit_lock.lock().await;
        let snapshot = self.repo.commit(token, write).await.map_err(|e| {
            log::warn!("commit for {} failed: {}", token, e);
            e
        })?;
        self.sink.publish(&snapshot);
        Ok(CommitReceipt {
            version: snapshot.version,
        })
    }
}
