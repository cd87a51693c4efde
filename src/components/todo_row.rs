//! Todo Row Component
//!
//! One todo: checkbox, text and a delete button. Rows still waiting for
//! the host to assign an id render dimmed with their controls disabled.

use leptos::prelude::*;

use crate::context::AppContext;
use crate::models::ViewRow;

#[component]
pub fn TodoRow(row: ViewRow) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let id = row.key.stored();
    let pending = id.is_none();
    let dom_key = row.key.to_string();

    let on_toggle = move |_| {
        if let Some(id) = id {
            ctx.toggle_todo(id);
        }
    };
    let on_remove = move |_| {
        if let Some(id) = id {
            ctx.remove_todo(id);
        }
    };

    view! {
        <li
            class="todo-row"
            class:completed=row.is_completed
            class:pending=pending
            data-key=dom_key
        >
            <label class="todo-label">
                <input
                    type="checkbox"
                    prop:checked=row.is_completed
                    disabled=pending
                    on:change=on_toggle
                />
                <span class="todo-text">{row.text}</span>
            </label>
            <button
                type="button"
                class="delete-btn"
                title="Delete"
                disabled=pending
                on:click=on_remove
            >
                "×"
            </button>
        </li>
    }
}
