//! Repository Layer - Core Traits
//!
//! Abstract interfaces for data access.

use async_trait::async_trait;
use rusqlite::Connection;
use todo_sync::{MutationToken, Snapshot};

use crate::domain::{DomainResult, Entity};

/// Core repository trait for CRUD operations
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity; the returned copy carries the assigned id
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities in insertion order
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity; `NotFound` if it is gone
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID; `NotFound` if it is gone
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Repositories whose writes are counted by a commit version
#[async_trait]
pub trait VersionedRepository<T: Entity>: Repository<T> {
    async fn current_version(&self) -> DomainResult<u64>;

    /// Version, full listing and retained commit tokens read together
    async fn snapshot(&self) -> DomainResult<Snapshot>;

    /// Run `write`, bump the version and log `token` in one transaction,
    /// then read the resulting snapshot inside it. Nothing persists unless
    /// every step succeeds.
    async fn commit<F>(&self, token: &MutationToken, write: F) -> DomainResult<Snapshot>
    where
        F: FnOnce(&Connection) -> DomainResult<()> + Send;
}
