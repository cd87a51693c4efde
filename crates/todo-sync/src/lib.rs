//! Todo Sync
//!
//! Client-side synchronization between a rendered todo list and a store
//! that answers live queries:
//! - model/error/text: records, failures and input validation shared with the store
//! - backend: the `LiveQuery` and `TodoBackend` seams
//! - view/patch: authoritative snapshot plus pending local patches
//! - coordinator: optimistic apply, dispatch, confirm or roll back
//! - memory: an in-process store implementing both seams

mod backend;
mod coordinator;
mod error;
mod memory;
mod model;
mod patch;
mod text;
mod view;

pub use backend::{LiveQuery, SnapshotCallback, Subscription, TodoBackend};
pub use coordinator::{Coordinator, CoordinatorConfig, Dispatch};
pub use error::{SyncError, SyncResult};
pub use memory::MemoryStore;
pub use model::{
    ClientId, CommitReceipt, MutationToken, PlaceholderId, RowKey, Snapshot, Todo, TodoId, ViewRow,
    COMMIT_LOG_LEN,
};
pub use patch::Patch;
pub use text::NonEmptyText;
pub use view::{MutationId, OptimisticView};
