//! Todo text validation

use serde::Serialize;

use crate::error::SyncError;

/// Todo text that is non-empty after trimming.
///
/// The text is kept as typed; only the emptiness check trims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    pub fn parse(raw: impl Into<String>) -> Result<Self, SyncError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(SyncError::Validation("todo text must not be empty".to_string()));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
