//! Tauri Commands for the Todo Live Query
//!
//! One query and three mutations. Every mutation carries the caller's token
//! and answers with the commit version it produced; the snapshot itself
//! arrives as a `todos-changed` event listing that token.

use tauri::State;
use todo_sync::{CommitReceipt, MutationToken, Snapshot, SyncError, TodoId};

use crate::AppState;

/// Current result of the "all todos" query
#[tauri::command]
pub async fn list_todos(state: State<'_, AppState>) -> Result<Snapshot, SyncError> {
    state.service.snapshot().await
}

/// Add a todo at the end of the list
#[tauri::command]
pub async fn add_todo(
    state: State<'_, AppState>,
    token: MutationToken,
    text: String,
) -> Result<CommitReceipt, SyncError> {
    state.service.add(token, text).await
}

/// Flip completion
#[tauri::command]
pub async fn toggle_todo(
    state: State<'_, AppState>,
    token: MutationToken,
    id: TodoId,
) -> Result<CommitReceipt, SyncError> {
    state.service.toggle(token, id).await
}

/// Delete a todo
#[tauri::command]
pub async fn remove_todo(
    state: State<'_, AppState>,
    token: MutationToken,
    id: TodoId,
) -> Result<CommitReceipt, SyncError> {
    state.service.remove(token, id).await
}
