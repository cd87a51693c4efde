//! Application Context
//!
//! The coordinator and the store, provided via Leptos Context API.

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_sync::{Coordinator, Dispatch, TodoId};

use crate::commands::TauriBackend;
use crate::store::{store_report_error, store_set_rows, TodoStore};

pub type TodoCoordinator = Coordinator<TauriBackend>;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Single-threaded; lives in local storage
    coordinator: StoredValue<TodoCoordinator, LocalStorage>,
    /// Rendered state - read
    pub store: TodoStore,
}

impl AppContext {
    pub fn new(coordinator: TodoCoordinator, store: TodoStore) -> Self {
        store_set_rows(&store, &coordinator.rows());
        coordinator.watch(move |rows| store_set_rows(&store, rows));
        Self {
            coordinator: StoredValue::new_local(coordinator),
            store,
        }
    }

    /// Returns false if the text was rejected before dispatch
    pub fn add_todo(&self, text: &str) -> bool {
        match self.coordinator.with_value(|c| c.add_todo(text)) {
            Ok(dispatch) => {
                self.run(dispatch);
                true
            }
            Err(e) => {
                store_report_error(&self.store, e.to_string());
                false
            }
        }
    }

    pub fn toggle_todo(&self, id: TodoId) {
        let dispatch = self.coordinator.with_value(|c| c.toggle_todo(id));
        self.run(dispatch);
    }

    pub fn remove_todo(&self, id: TodoId) {
        let dispatch = self.coordinator.with_value(|c| c.remove_todo(id));
        self.run(dispatch);
    }

    /// Revert patches the host never confirmed
    pub fn expire_stale(&self) {
        let errors = self
            .coordinator
            .try_with_value(|c| c.expire_stale(Utc::now()))
            .unwrap_or_default();
        for e in errors {
            store_report_error(&self.store, e.to_string());
        }
    }

    /// Stop following the live query (in-flight mutations still land)
    pub fn disconnect(&self) {
        let _ = self.coordinator.try_with_value(|c| c.disconnect());
    }

    fn run(&self, dispatch: Dispatch) {
        let store = self.store;
        spawn_local(async move {
            if let Err(e) = dispatch.await {
                store_report_error(&store, e.to_string());
            }
        });
    }
}
