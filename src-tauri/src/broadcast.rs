//! Snapshot Broadcast
//!
//! Pushes every committed snapshot to all open windows; each window is
//! one client of the live query.

use tauri::{AppHandle, Emitter};
use todo_store::SnapshotSink;
use todo_sync::Snapshot;

/// Event carrying a full `Snapshot` payload
pub const TODOS_CHANGED: &str = "todos-changed";

pub struct WindowBroadcast {
    app: AppHandle,
}

impl WindowBroadcast {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl SnapshotSink for WindowBroadcast {
    fn publish(&self, snapshot: &Snapshot) {
        log::debug!("broadcasting snapshot v{}", snapshot.version);
        if let Err(e) = self.app.emit(TODOS_CHANGED, snapshot) {
            log::warn!("Failed to emit {}: {}", TODOS_CHANGED, e);
        }
    }
}
