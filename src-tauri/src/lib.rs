//! Todo Live Backend
//!
//! The Tauri host is the authoritative store for every window:
//! - commands: the live query and its mutations, window management
//! - broadcast: snapshot push to all windows after each commit
//! - storage and versioning live in the `todo-store` crate

use std::path::PathBuf;
use std::sync::Arc;
use tauri::Manager;

mod broadcast;
mod commands;

use broadcast::WindowBroadcast;
use todo_store::{init_db, TodoRepository, TodoService};

/// Environment override for the database location
const DB_PATH_ENV: &str = "TODO_LIVE_DB";

/// Application state shared across commands
pub struct AppState {
    pub service: TodoService,
}

/// Get database path from the environment or the app data dir
fn get_db_path(app_handle: &tauri::AppHandle) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    let app_dir = app_handle.path().app_data_dir()?;
    std::fs::create_dir_all(&app_dir)?;
    Ok(app_dir.join("todo_live.db"))
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .setup(|app| {
            // Single instance check - must be first!
            // A second launch becomes a second window instead.
            #[cfg(desktop)]
            app.handle().plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
                if let Err(e) = commands::spawn_window(app) {
                    log::warn!("Failed to open window for second instance: {}", e);
                }
            }))?;

            let app_handle = app.handle().clone();

            // Initialize logging
            rolling_logger::init_logger(app_handle.path().app_log_dir()?, "TodoLive")?;

            let db_path = get_db_path(&app_handle)?;
            log::info!("App setup starting, db at {}", db_path.display());

            // Windows fetch the list before their first paint, so the
            // database has to be ready before any window can ask.
            let db_state = tauri::async_runtime::block_on(init_db(&db_path))?;

            let sink = Arc::new(WindowBroadcast::new(app_handle.clone()));
            let service = TodoService::new(TodoRepository::new(db_state.connection()), sink);

            app.manage(AppState { service });
            let _ = rolling_logger::info("State managed, app will start");

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::list_todos,
            commands::add_todo,
            commands::toggle_todo,
            commands::remove_todo,
            commands::open_window,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
