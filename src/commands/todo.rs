//! Todo Commands
//!
//! `TodoBackend` and `LiveQuery` over Tauri IPC: the host answers the
//! query and mutations, and pushes `todos-changed` after every commit.

use async_trait::async_trait;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use todo_sync::{
    CommitReceipt, LiveQuery, MutationToken, NonEmptyText, Snapshot, SnapshotCallback,
    Subscription, SyncError, SyncResult, TodoBackend, TodoId,
};

use super::{invoke, listen};

/// Event the host emits with a full snapshot
pub const TODOS_CHANGED: &str = "todos-changed";

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
struct AddTodoArgs<'a> {
    token: &'a MutationToken,
    text: &'a str,
}

#[derive(Serialize)]
struct IdArgs<'a> {
    token: &'a MutationToken,
    id: TodoId,
}

// ========================
// Transport helpers
// ========================

fn to_args<T: Serialize>(args: &T) -> SyncResult<JsValue> {
    serde_wasm_bindgen::to_value(args).map_err(|e| SyncError::Internal(format!("Serialization error: {}", e)))
}

/// A rejected invoke carries the command's `SyncError`; anything else
/// means the host could not be reached.
fn decode_error(err: JsValue) -> SyncError {
    match serde_wasm_bindgen::from_value::<SyncError>(err.clone()) {
        Ok(error) => error,
        Err(_) => SyncError::Connectivity(err.as_string().unwrap_or_else(|| format!("{:?}", err))),
    }
}

async fn call<T: DeserializeOwned>(cmd: &str, args: JsValue) -> SyncResult<T> {
    let value = invoke(cmd, args).await.map_err(decode_error)?;
    serde_wasm_bindgen::from_value(value).map_err(|e| SyncError::Internal(format!("Response error: {}", e)))
}

// ========================
// Commands
// ========================

/// Store reached through the Tauri host
#[derive(Debug, Clone, Copy, Default)]
pub struct TauriBackend;

#[async_trait(?Send)]
impl TodoBackend for TauriBackend {
    async fn list_todos(&self) -> SyncResult<Snapshot> {
        call("list_todos", JsValue::NULL).await
    }

    async fn add_todo(&self, token: &MutationToken, text: &NonEmptyText) -> SyncResult<CommitReceipt> {
        call("add_todo", to_args(&AddTodoArgs { token, text: text.as_str() })?).await
    }

    async fn toggle_todo(&self, token: &MutationToken, id: TodoId) -> SyncResult<CommitReceipt> {
        call("toggle_todo", to_args(&IdArgs { token, id })?).await
    }

    async fn remove_todo(&self, token: &MutationToken, id: TodoId) -> SyncResult<CommitReceipt> {
        call("remove_todo", to_args(&IdArgs { token, id })?).await
    }
}

// ========================
// Live query
// ========================

#[derive(Default)]
struct Registration {
    handler: Option<Closure<dyn FnMut(JsValue)>>,
    unlisten: Option<js_sys::Function>,
    cancelled: bool,
}

impl Registration {
    /// Unlisten first: the host may still call the handler until then
    fn release(&mut self) {
        if let Some(unlisten) = self.unlisten.take() {
            let _ = unlisten.call0(&JsValue::NULL);
            self.handler = None;
        }
    }
}

/// `todos-changed` listener plus a fresh `list_todos` on each subscribe
#[derive(Debug, Clone, Copy, Default)]
pub struct TauriLiveQuery;

impl LiveQuery for TauriLiveQuery {
    fn subscribe(&self, on_snapshot: SnapshotCallback) -> Subscription {
        let on_snapshot = Rc::new(RefCell::new(on_snapshot));
        let registration = Rc::new(RefCell::new(Registration::default()));
        // The handler stays registered until `listen` resolves
        let active = Rc::new(Cell::new(true));

        let deliver = Rc::clone(&on_snapshot);
        let handler_active = Rc::clone(&active);
        let handler = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            if !handler_active.get() {
                return;
            }
            let payload = js_sys::Reflect::get(&event, &JsValue::from_str("payload")).unwrap_or(JsValue::NULL);
            match serde_wasm_bindgen::from_value::<Snapshot>(payload) {
                Ok(snapshot) => (deliver.borrow_mut())(snapshot),
                Err(e) => web_sys::console::warn_1(&format!("[LIVE] Bad {} payload: {}", TODOS_CHANGED, e).into()),
            }
        });
        let pending_unlisten = listen(TODOS_CHANGED, &handler);
        registration.borrow_mut().handler = Some(handler);

        let reg = Rc::clone(&registration);
        spawn_local(async move {
            match JsFuture::from(pending_unlisten).await {
                Ok(unlisten) => {
                    let mut reg = reg.borrow_mut();
                    reg.unlisten = Some(unlisten.unchecked_into::<js_sys::Function>());
                    if reg.cancelled {
                        reg.release();
                    }
                }
                Err(e) => web_sys::console::error_1(&format!("[LIVE] listen failed: {:?}", e).into()),
            }
        });

        // Fresh initial snapshot for this subscription
        let initial = Rc::clone(&on_snapshot);
        let reg = Rc::clone(&registration);
        spawn_local(async move {
            match TauriBackend.list_todos().await {
                Ok(snapshot) => {
                    if !reg.borrow().cancelled {
                        (initial.borrow_mut())(snapshot);
                    }
                }
                Err(e) => web_sys::console::warn_1(&format!("[LIVE] initial fetch failed: {}", e).into()),
            }
        });

        Subscription::new(move || {
            active.set(false);
            let mut reg = registration.borrow_mut();
            reg.cancelled = true;
            reg.release();
        })
    }
}
