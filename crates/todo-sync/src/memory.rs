//! In-Process Store
//!
//! Authoritative todo collection living in the same thread as its clients.
//! Used for tests and demos; mirrors the contract of the SQLite-backed
//! store: ids in insertion order, one version bump per commit, a full
//! snapshot (with the latest commit tokens) pushed to every subscriber
//! after each commit.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::backend::{LiveQuery, SnapshotCallback, Subscription, TodoBackend};
use crate::error::{SyncError, SyncResult};
use crate::model::{CommitReceipt, MutationToken, Snapshot, Todo, TodoId, COMMIT_LOG_LEN};
use crate::text::NonEmptyText;

type SharedCallback = Rc<RefCell<SnapshotCallback>>;

#[derive(Default)]
struct Inner {
    todos: Vec<Todo>,
    next_id: u64,
    version: u64,
    /// Tokens of the latest commits, oldest first
    applied: VecDeque<MutationToken>,
    offline: bool,
    held: bool,
    requests: usize,
    subscribers: Vec<(u64, SharedCallback)>,
    next_subscriber: u64,
}

impl Inner {
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.version, self.todos.clone()).with_applied(self.applied.iter().cloned().collect())
    }
}

/// Cheap-to-clone handle; clones share the same collection
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.borrow().snapshot()
    }

    /// Simulate transport loss. While offline, requests fail with
    /// `Connectivity` and nothing is pushed; coming back online pushes the
    /// current snapshot to every subscriber.
    pub fn set_offline(&self, offline: bool) {
        let was_offline = std::mem::replace(&mut self.inner.borrow_mut().offline, offline);
        if was_offline && !offline {
            self.broadcast();
        }
    }

    /// Queue pushes instead of delivering them (models network latency)
    pub fn hold_delivery(&self) {
        self.inner.borrow_mut().held = true;
    }

    /// Deliver the current snapshot and resume immediate pushes
    pub fn release_delivery(&self) {
        self.inner.borrow_mut().held = false;
        self.broadcast();
    }

    /// Number of mutation requests that reached the store
    pub fn request_count(&self) -> usize {
        self.inner.borrow().requests
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn commit(
        &self,
        token: &MutationToken,
        apply: impl FnOnce(&mut Inner) -> SyncResult<()>,
    ) -> SyncResult<CommitReceipt> {
        let receipt = {
            let mut inner = self.inner.borrow_mut();
            if inner.offline {
                return Err(SyncError::Connectivity("store unreachable".to_string()));
            }
            inner.requests += 1;
            apply(&mut *inner)?;
            inner.version += 1;
            if inner.applied.len() == COMMIT_LOG_LEN {
                inner.applied.pop_front();
            }
            inner.applied.push_back(token.clone());
            CommitReceipt { version: inner.version }
        };
        log::debug!("memory store committed v{} for {}", receipt.version, token);
        self.broadcast();
        Ok(receipt)
    }

    fn broadcast(&self) {
        let (snapshot, callbacks) = {
            let inner = self.inner.borrow();
            if inner.offline || inner.held {
                return;
            }
            let callbacks: Vec<SharedCallback> =
                inner.subscribers.iter().map(|(_, cb)| Rc::clone(cb)).collect();
            (inner.snapshot(), callbacks)
        };
        for callback in callbacks {
            (callback.borrow_mut())(snapshot.clone());
        }
    }
}

impl LiveQuery for MemoryStore {
    fn subscribe(&self, on_snapshot: SnapshotCallback) -> Subscription {
        let callback: SharedCallback = Rc::new(RefCell::new(on_snapshot));
        let (key, initial) = {
            let mut inner = self.inner.borrow_mut();
            let key = inner.next_subscriber;
            inner.next_subscriber += 1;
            inner.subscribers.push((key, Rc::clone(&callback)));
            let initial = (!inner.offline).then(|| inner.snapshot());
            (key, initial)
        };
        if let Some(snapshot) = initial {
            (callback.borrow_mut())(snapshot);
        }

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().subscribers.retain(|(k, _)| *k != key);
            }
        })
    }
}

#[async_trait(?Send)]
impl TodoBackend for MemoryStore {
    async fn list_todos(&self) -> SyncResult<Snapshot> {
        if self.inner.borrow().offline {
            return Err(SyncError::Connectivity("store unreachable".to_string()));
        }
        Ok(self.snapshot())
    }

    async fn add_todo(&self, token: &MutationToken, text: &NonEmptyText) -> SyncResult<CommitReceipt> {
        let text = text.as_str().to_string();
        self.commit(token, move |inner| {
            inner.next_id += 1;
            let todo = Todo {
                id: TodoId(inner.next_id),
                text,
                is_completed: false,
                created_at: chrono::Utc::now().timestamp_millis(),
            };
            inner.todos.push(todo);
            Ok(())
        })
    }

    async fn toggle_todo(&self, token: &MutationToken, id: TodoId) -> SyncResult<CommitReceipt> {
        self.commit(token, |inner| {
            let todo = inner
                .todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(SyncError::NotFound(id))?;
            todo.is_completed = !todo.is_completed;
            Ok(())
        })
    }

    async fn remove_todo(&self, token: &MutationToken, id: TodoId) -> SyncResult<CommitReceipt> {
        self.commit(token, |inner| {
            let before = inner.todos.len();
            inner.todos.retain(|t| t.id != id);
            if inner.todos.len() == before {
                return Err(SyncError::NotFound(id));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClientId;

    fn text(s: &str) -> NonEmptyText {
        NonEmptyText::parse(s).unwrap()
    }

    fn token(seq: u64) -> MutationToken {
        MutationToken::new(ClientId::from("test"), seq)
    }

    #[tokio::test]
    async fn test_ids_and_versions_increase() {
        let store = MemoryStore::new();
        let first = store.add_todo(&token(0), &text("a")).await.unwrap();
        let second = store.add_todo(&token(1), &text("b")).await.unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);

        let snapshot = store.list_todos().await.unwrap();
        assert_eq!(snapshot.version, 2);
        assert!(snapshot.todos[0].id < snapshot.todos[1].id);
    }

    #[tokio::test]
    async fn test_not_found_does_not_bump_version() {
        let store = MemoryStore::new();
        assert_eq!(store.toggle_todo(&token(0), TodoId(42)).await, Err(SyncError::NotFound(TodoId(42))));
        assert_eq!(store.remove_todo(&token(1), TodoId(42)).await, Err(SyncError::NotFound(TodoId(42))));
        assert_eq!(store.snapshot().version, 0);
        assert!(store.snapshot().applied.is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_receive_initial_and_live_snapshots() {
        let store = MemoryStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = store.subscribe(Box::new(move |s: Snapshot| sink.borrow_mut().push(s.version)));

        store.add_todo(&token(0), &text("a")).await.unwrap();
        assert_eq!(*seen.borrow(), [0, 1]);

        drop(subscription);
        assert_eq!(store.subscriber_count(), 0);
        store.add_todo(&token(1), &text("b")).await.unwrap();
        assert_eq!(*seen.borrow(), [0, 1]);
    }

    #[tokio::test]
    async fn test_offline_rejects_and_reconnect_pushes() {
        let store = MemoryStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = store.subscribe(Box::new(move |s: Snapshot| sink.borrow_mut().push(s.version)));

        store.set_offline(true);
        assert!(matches!(store.add_todo(&token(0), &text("a")).await, Err(SyncError::Connectivity(_))));
        assert_eq!(store.request_count(), 0);

        store.set_offline(false);
        assert_eq!(*seen.borrow(), [0, 0]);
    }

    #[tokio::test]
    async fn test_held_delivery_is_released() {
        let store = MemoryStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = store.subscribe(Box::new(move |s: Snapshot| sink.borrow_mut().push(s.version)));

        store.hold_delivery();
        store.add_todo(&token(0), &text("a")).await.unwrap();
        store.add_todo(&token(1), &text("b")).await.unwrap();
        assert_eq!(*seen.borrow(), [0]);

        store.release_delivery();
        assert_eq!(*seen.borrow(), [0, 2]);
    }

    #[tokio::test]
    async fn test_snapshots_carry_latest_commit_tokens() {
        let store = MemoryStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = store.subscribe(Box::new(move |s: Snapshot| sink.borrow_mut().push(s)));

        store.add_todo(&token(0), &text("a")).await.unwrap();
        let pushed = seen.borrow().last().cloned().unwrap();
        assert!(pushed.includes(&token(0)));

        for seq in 1..=COMMIT_LOG_LEN as u64 {
            store.add_todo(&token(seq), &text("more")).await.unwrap();
        }
        let snapshot = store.snapshot();
        assert_eq!(snapshot.applied.len(), COMMIT_LOG_LEN);
        assert!(!snapshot.includes(&token(0)));
        assert!(snapshot.includes(&token(COMMIT_LOG_LEN as u64)));
    }
}
