//! Error Banner Component
//!
//! Shows the last failed mutation until dismissed.

use leptos::prelude::*;

use crate::store::{store_clear_error, use_todo_store, TodoStateStoreFields};

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let store = use_todo_store();

    view! {
        {move || store.error().get().map(|message| view! {
            <div class="error-banner" role="alert">
                <span>{message}</span>
                <button type="button" class="dismiss-btn" on:click=move |_| store_clear_error(&store)>
                    "Dismiss"
                </button>
            </div>
        })}
    }
}
