//! Commands Layer
//!
//! Tauri command handlers that bridge windows to the todo store.

mod todo_cmd;
mod window_cmd;

pub use todo_cmd::*;
pub use window_cmd::*;
