//! Todo List Component

use leptos::prelude::*;

use super::{EmptyState, TodoRow};
use crate::store::{use_todo_store, TodoStateStoreFields};

/// Rows in snapshot order, pending adds last
#[component]
pub fn TodoList() -> impl IntoView {
    let store = use_todo_store();

    view! {
        <Show
            when=move || !store.rows().get().is_empty()
            fallback=|| view! { <EmptyState /> }
        >
            <ul class="todo-list">
                <For
                    each=move || store.rows().get()
                    key=|row| (row.key, row.is_completed)
                    children=move |row| view! { <TodoRow row=row /> }
                />
            </ul>
        </Show>
    }
}
