//! Domain Layer
//!
//! Entities and the core abstractions the repositories are written against.

mod entity;
mod todo;

pub use entity::{DomainError, DomainResult, Entity};
pub use todo::new_todo;
pub use todo_sync::{NonEmptyText, Todo, TodoId};
