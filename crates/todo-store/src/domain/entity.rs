//! Domain Layer - Core Entity Trait
//!
//! Basic contract for all stored entities: a unique ID, thread-safe.

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Domain errors are the sync errors clients already understand
pub type DomainError = todo_sync::SyncError;

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
