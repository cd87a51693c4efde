//! Window Commands
//!
//! Frontend bindings for opening more client windows.

use wasm_bindgen::prelude::*;
use todo_sync::ClientId;
use super::{get_current_window, invoke};

/// Client id for this page load: the window label plus the load time, so
/// a reloaded window never reuses the tokens of its previous page
pub fn current_client() -> ClientId {
    let label = js_sys::Reflect::get(&get_current_window(), &JsValue::from_str("label"))
        .ok()
        .and_then(|label| label.as_string())
        .unwrap_or_else(|| {
            web_sys::console::warn_1(&"[WINDOW] No window label, using \"main\"".into());
            "main".to_string()
        });
    ClientId(format!("{}@{}", label, js_sys::Date::now() as u64))
}

/// Open another window on the same store; returns its label
pub async fn open_window() -> Result<String, String> {
    let result = invoke("open_window", JsValue::NULL)
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| format!("{:?}", e)))?;
    serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())
}
