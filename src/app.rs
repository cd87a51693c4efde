//! Todo Live Frontend App
//!
//! Single card: form, list, and a way to open more windows.

use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use todo_sync::{Coordinator, CoordinatorConfig};

use crate::commands::{self, TauriBackend, TauriLiveQuery};
use crate::components::{ErrorBanner, TodoForm, TodoList};
use crate::context::AppContext;
use crate::models::Snapshot;
use crate::store::{active_count, store_report_error, TodoState, TodoStateStoreFields};

/// How often unconfirmed patches are checked
const EXPIRY_CHECK_MS: u32 = 1_000;

/// `initial` is fetched before mount, so the first paint has data
#[component]
pub fn App(initial: Snapshot) -> impl IntoView {
    let store = Store::new(TodoState::default());
    provide_context(store);

    let config = CoordinatorConfig {
        client: commands::current_client(),
        ..Default::default()
    };
    let coordinator = Coordinator::new(TauriBackend, initial, config);
    coordinator.connect(&TauriLiveQuery);
    let ctx = AppContext::new(coordinator, store);
    provide_context(ctx);

    // Root component: lives as long as the window
    Interval::new(EXPIRY_CHECK_MS, move || ctx.expire_stale()).forget();
    on_cleanup(move || ctx.disconnect());

    let has_rows = move || !store.rows().get().is_empty();
    let active_label = move || format!("{} active", active_count(&store.rows().get()));

    let on_open_window = move |_| {
        spawn_local(async move {
            match commands::open_window().await {
                Ok(label) => web_sys::console::log_1(&format!("[APP] Opened {}", label).into()),
                Err(e) => store_report_error(&store, e),
            }
        });
    };

    view! {
        <main class="app-layout">
            <section class="todo-card">
                <header class="todo-header">
                    <div>
                        <h1>"Todo List"</h1>
                        <p class="subtitle">"Open another window to watch changes sync live."</p>
                    </div>
                    <Show when=has_rows>
                        <span class="badge">{active_label}</span>
                    </Show>
                </header>

                <ErrorBanner />
                <TodoForm />
                <TodoList />
            </section>

            <button type="button" class="open-window-btn" on:click=on_open_window>
                "Open another window"
            </button>
        </main>
    }
}
