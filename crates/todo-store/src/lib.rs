//! Todo Store
//!
//! Layered architecture:
//! - domain: entities and core abstractions
//! - repository: data access abstractions and the SQLite implementation
//! - service: transactional, versioned writes that publish snapshots

pub mod domain;
pub mod repository;
mod service;

pub use repository::{init_db, DbState, TodoRepository};
pub use service::{SnapshotSink, TodoService};
