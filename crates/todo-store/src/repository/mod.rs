//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod todo_repo;

#[cfg(test)]
mod tests;

pub use traits::{Repository, VersionedRepository};
pub use db::{init_db, DbState};
pub use todo_repo::TodoRepository;
pub(crate) use todo_repo::{delete_todo, find_todo, insert_todo, update_todo};
