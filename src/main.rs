//! Todo Live Frontend Entry Point

mod models;
mod commands;
mod context;
mod store;
mod components;
mod app;

use app::App;
use commands::TauriBackend;
use leptos::prelude::*;
use models::Snapshot;
use todo_sync::TodoBackend;

fn main() {
    console_error_panic_hook::set_once();

    // Fetch before mounting so the list never renders a loading state
    wasm_bindgen_futures::spawn_local(async {
        let initial = match TauriBackend.list_todos().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                web_sys::console::error_1(&format!("[APP] Initial fetch failed: {}", e).into());
                Snapshot::default()
            }
        };
        web_sys::console::log_1(
            &format!("[APP] Mounting with {} todos (v{})", initial.todos.len(), initial.version).into(),
        );
        mount_to_body(move || view! { <App initial=initial /> });
    });
}
