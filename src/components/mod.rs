//! UI Components
//!
//! Reusable Leptos components.

mod todo_form;
mod todo_list;
mod todo_row;
mod empty_state;
mod error_banner;

pub use todo_form::TodoForm;
pub use todo_list::TodoList;
pub use todo_row::TodoRow;
pub use empty_state::EmptyState;
pub use error_banner::ErrorBanner;
