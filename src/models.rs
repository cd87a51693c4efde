//! Frontend Models
//!
//! Data structures shared with the host through the sync crate.

pub use todo_sync::{RowKey, Snapshot, TodoId, ViewRow};
