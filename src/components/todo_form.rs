//! Todo Form Component
//!
//! Input plus submit button for new todos.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::context::AppContext;

#[component]
pub fn TodoForm() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (new_text, set_new_text) = signal(String::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = new_text.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        // The row shows up optimistically, so the input clears right away
        if ctx.add_todo(&text) {
            set_new_text.set(String::new());
        }
    };

    view! {
        <form class="todo-form" on:submit=submit>
            <input
                type="text"
                placeholder="What needs to be done?"
                prop:value=move || new_text.get()
                on:input=move |ev| {
                    if let Some(input) = ev
                        .target()
                        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                    {
                        set_new_text.set(input.value());
                    }
                }
            />
            <button type="submit" disabled=move || new_text.get().trim().is_empty()>
                "Add"
            </button>
        </form>
    }
}
