//! Data Access Seams
//!
//! What the coordinator needs from a store: a live "all todos" query and
//! the three mutations. Implementations are single-threaded (`?Send`) so
//! they can wrap browser promises.

use async_trait::async_trait;

use crate::error::SyncResult;
use crate::model::{CommitReceipt, MutationToken, Snapshot, TodoId};
use crate::text::NonEmptyText;

/// Receives every snapshot a live query produces
pub type SnapshotCallback = Box<dyn FnMut(Snapshot)>;

/// Push-based "all todos" query
pub trait LiveQuery {
    /// Register `on_snapshot`. The first call delivers the current
    /// snapshot, later calls follow every change to the collection.
    fn subscribe(&self, on_snapshot: SnapshotCallback) -> Subscription;
}

/// Registration of a live query; unregisters on `cancel` or drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Mutations and the one-shot query against the store.
///
/// A committed mutation's `token` must show up in the `applied` list of
/// every snapshot that includes the commit.
#[async_trait(?Send)]
pub trait TodoBackend {
    /// One-shot fetch, used before first render
    async fn list_todos(&self) -> SyncResult<Snapshot>;

    async fn add_todo(&self, token: &MutationToken, text: &NonEmptyText) -> SyncResult<CommitReceipt>;

    /// Fails with `NotFound` if `id` no longer exists
    async fn toggle_todo(&self, token: &MutationToken, id: TodoId) -> SyncResult<CommitReceipt>;

    /// Fails with `NotFound` if `id` no longer exists
    async fn remove_todo(&self, token: &MutationToken, id: TodoId) -> SyncResult<CommitReceipt>;
}
