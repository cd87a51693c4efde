//! Optimistic Mutation Coordinator
//!
//! Applies each mutation to the local view synchronously, dispatches it to
//! the store, and folds the outcome back in: confirmations wait for the
//! live query to catch up, failures roll back. Outcomes that arrive after
//! the patch is gone (already reflected, or expired) are only logged.

use chrono::{DateTime, Duration, Utc};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};

use crate::backend::{LiveQuery, Subscription, TodoBackend};
use crate::error::{SyncError, SyncResult};
use crate::model::{ClientId, CommitReceipt, MutationToken, Snapshot, TodoId, ViewRow};
use crate::patch::Patch;
use crate::text::NonEmptyText;
use crate::view::{MutationId, OptimisticView};

/// Remote half of a mutation. The local patch is already visible when
/// this is returned; awaiting it performs the store call.
pub type Dispatch = Pin<Box<dyn Future<Output = SyncResult<()>>>>;

type Listener = Box<dyn Fn(&[ViewRow])>;

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Tags every mutation token; unique per client of one store
    pub client: ClientId,
    /// How long a patch may wait for the store before it is reverted
    pub confirm_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            client: ClientId::from("main"),
            confirm_timeout: Duration::seconds(10),
        }
    }
}

struct Shared<B> {
    backend: B,
    config: CoordinatorConfig,
    view: RefCell<OptimisticView>,
    listeners: RefCell<Vec<Listener>>,
    subscription: RefCell<Option<Subscription>>,
}

impl<B> Shared<B> {
    fn notify(&self) {
        let rows = self.view.borrow().rows().to_vec();
        for listener in self.listeners.borrow().iter() {
            listener(&rows);
        }
    }

    fn apply_snapshot(&self, snapshot: Snapshot) {
        let applied = self.view.borrow_mut().apply_snapshot(snapshot);
        if applied {
            self.notify();
        }
    }

    fn begin(&self, patch: Patch) -> (MutationId, MutationToken) {
        let (id, token) = {
            let mut view = self.view.borrow_mut();
            let id = view.begin(patch, Utc::now());
            (id, view.token(id))
        };
        log::debug!("optimistic mutation {}", token);
        self.notify();
        (id, token)
    }

    fn settle(&self, mutation: MutationId, outcome: SyncResult<CommitReceipt>) -> SyncResult<()> {
        match outcome {
            Ok(receipt) => {
                if !self.view.borrow_mut().confirm(mutation, receipt) {
                    log::debug!("receipt v{} for a patch no longer pending", receipt.version);
                }
                self.notify();
                Ok(())
            }
            Err(err) => {
                let rolled_back = self.view.borrow_mut().reject(mutation);
                match rolled_back {
                    Some(patch) => {
                        log::warn!("rolled back {}: {}", patch, err);
                        self.notify();
                        Err(err)
                    }
                    None => {
                        log::debug!("late failure for a patch no longer pending: {}", err);
                        Ok(())
                    }
                }
            }
        }
    }
}

/// Single-threaded coordinator; clones share state
pub struct Coordinator<B> {
    shared: Rc<Shared<B>>,
}

impl<B> Clone for Coordinator<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<B: TodoBackend + 'static> Coordinator<B> {
    /// `initial` is the snapshot fetched before first render
    pub fn new(backend: B, initial: Snapshot, config: CoordinatorConfig) -> Self {
        let view = OptimisticView::new(initial, config.client.clone());
        Self {
            shared: Rc::new(Shared {
                backend,
                config,
                view: RefCell::new(view),
                listeners: RefCell::new(Vec::new()),
                subscription: RefCell::new(None),
            }),
        }
    }

    /// Follow `live`. Replaces any previous subscription.
    pub fn connect(&self, live: &dyn LiveQuery) {
        let weak: Weak<Shared<B>> = Rc::downgrade(&self.shared);
        let subscription = live.subscribe(Box::new(move |snapshot: Snapshot| {
            if let Some(shared) = weak.upgrade() {
                shared.apply_snapshot(snapshot);
            }
        }));
        let previous = self.shared.subscription.borrow_mut().replace(subscription);
        drop(previous);
    }

    /// Stop following the live query. In-flight dispatches still complete.
    pub fn disconnect(&self) {
        let subscription = self.shared.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }

    pub fn is_connected(&self) -> bool {
        self.shared.subscription.borrow().is_some()
    }

    /// Call `listener` with the rows after every change
    pub fn watch(&self, listener: impl Fn(&[ViewRow]) + 'static) {
        self.shared.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn rows(&self) -> Vec<ViewRow> {
        self.shared.view.borrow().rows().to_vec()
    }

    pub fn active_count(&self) -> usize {
        self.shared.view.borrow().active_count()
    }

    pub fn pending_count(&self) -> usize {
        self.shared.view.borrow().pending_count()
    }

    pub fn authoritative(&self) -> Snapshot {
        self.shared.view.borrow().authoritative().clone()
    }

    /// Blank text is rejected here: no patch, no store call.
    pub fn add_todo(&self, raw: &str) -> SyncResult<Dispatch> {
        let text = NonEmptyText::parse(raw)?;
        let placeholder = self.shared.view.borrow_mut().next_placeholder();
        let (mutation, token) = self.shared.begin(Patch::Add {
            placeholder,
            text: text.as_str().to_string(),
        });
        let shared = Rc::clone(&self.shared);
        Ok(Box::pin(async move {
            let outcome = shared.backend.add_todo(&token, &text).await;
            shared.settle(mutation, outcome)
        }))
    }

    pub fn toggle_todo(&self, id: TodoId) -> Dispatch {
        let (mutation, token) = self.shared.begin(Patch::Toggle(id));
        let shared = Rc::clone(&self.shared);
        Box::pin(async move {
            let outcome = shared.backend.toggle_todo(&token, id).await;
            shared.settle(mutation, outcome)
        })
    }

    pub fn remove_todo(&self, id: TodoId) -> Dispatch {
        let (mutation, token) = self.shared.begin(Patch::Remove(id));
        let shared = Rc::clone(&self.shared);
        Box::pin(async move {
            let outcome = shared.backend.remove_todo(&token, id).await;
            shared.settle(mutation, outcome)
        })
    }

    /// Revert patches the store has not confirmed within the configured
    /// timeout. One `Connectivity` error per reverted mutation.
    pub fn expire_stale(&self, now: DateTime<Utc>) -> Vec<SyncError> {
        let timeout = self.shared.config.confirm_timeout;
        let expired = self.shared.view.borrow_mut().expire(now - timeout);
        if expired.is_empty() {
            return Vec::new();
        }
        self.shared.notify();
        expired
            .into_iter()
            .map(|(_, patch)| {
                let message = format!("no confirmation for {} within {}s", patch, timeout.num_seconds());
                log::warn!("{}", message);
                SyncError::Connectivity(message)
            })
            .collect()
    }
}
