//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The coordinator
//! owns the truth; this is what components read.

use leptos::prelude::*;
use reactive_stores::Store;
use crate::models::ViewRow;

/// Rendered state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct TodoState {
    /// Rows to render, optimistic patches included
    pub rows: Vec<ViewRow>,
    /// Last failure reported to the user
    pub error: Option<String>,
}

/// Type alias for the store
pub type TodoStore = Store<TodoState>;

/// Get the todo store from context
pub fn use_todo_store() -> TodoStore {
    expect_context::<TodoStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the rendered rows
pub fn store_set_rows(store: &TodoStore, rows: &[ViewRow]) {
    *store.rows().write() = rows.to_vec();
}

/// Show an error banner
pub fn store_report_error(store: &TodoStore, message: String) {
    web_sys::console::warn_1(&format!("[TODO] {}", message).into());
    *store.error().write() = Some(message);
}

/// Dismiss the error banner
pub fn store_clear_error(store: &TodoStore) {
    *store.error().write() = None;
}

/// Number of rows not completed
pub fn active_count(rows: &[ViewRow]) -> usize {
    rows.iter().filter(|row| !row.is_completed).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RowKey, TodoId};

    #[test]
    fn test_active_count() {
        let row = |id, done| ViewRow {
            key: RowKey::Stored(TodoId(id)),
            text: format!("todo {}", id),
            is_completed: done,
        };
        assert_eq!(active_count(&[]), 0);
        assert_eq!(active_count(&[row(1, false), row(2, true), row(3, false)]), 2);
    }
}
