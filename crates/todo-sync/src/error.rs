//! Sync Errors
//!
//! Failure taxonomy shared by the store, the transport and the coordinator.

use serde::{Deserialize, Serialize};

use crate::model::TodoId;

/// Common result type for store and coordinator operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Every failure is recoverable at the level of a single user action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum SyncError {
    /// Caller input violates a precondition
    Validation(String),
    /// Mutation target no longer exists in the store
    NotFound(TodoId),
    /// The store could not be reached, or never confirmed
    Connectivity(String),
    /// Store-side failure
    Internal(String),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Validation(msg) => write!(f, "Invalid input: {}", msg),
            SyncError::NotFound(id) => write!(f, "Not found: todo {}", id),
            SyncError::Connectivity(msg) => write!(f, "Connectivity error: {}", msg),
            SyncError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {}
