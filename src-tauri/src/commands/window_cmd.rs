//! Window Commands
//!
//! Extra windows are extra clients of the same store.

use std::sync::atomic::{AtomicU32, Ordering};
use tauri::{AppHandle, WebviewUrl, WebviewWindowBuilder};

static NEXT_WINDOW: AtomicU32 = AtomicU32::new(1);

/// Open another todo window
pub fn spawn_window(app: &AppHandle) -> tauri::Result<String> {
    let label = format!("todo-{}", NEXT_WINDOW.fetch_add(1, Ordering::Relaxed));
    WebviewWindowBuilder::new(app, label.as_str(), WebviewUrl::App("index.html".into()))
        .title("Todo Live")
        .inner_size(480.0, 640.0)
        .build()?;
    log::info!("opened window {}", label);
    Ok(label)
}

#[tauri::command]
pub async fn open_window(app: AppHandle) -> Result<String, String> {
    spawn_window(&app).map_err(|e| e.to_string())
}
