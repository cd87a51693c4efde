//! Local Patches
//!
//! The transformation a mutation is expected to cause on the server,
//! replayed against the client's rows for immediate feedback.

use std::fmt;

use crate::model::{PlaceholderId, RowKey, TodoId, ViewRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    /// Append a not-yet-persisted todo at the end
    Add { placeholder: PlaceholderId, text: String },
    /// Flip completion of a stored todo
    Toggle(TodoId),
    /// Drop a stored todo
    Remove(TodoId),
}

impl Patch {
    /// Apply to rows in place. Targets missing from `rows` are ignored.
    pub fn apply(&self, rows: &mut Vec<ViewRow>) {
        match self {
            Patch::Add { placeholder, text } => rows.push(ViewRow {
                key: RowKey::Pending(*placeholder),
                text: text.clone(),
                is_completed: false,
            }),
            Patch::Toggle(id) => {
                if let Some(row) = rows.iter_mut().find(|row| row.key == RowKey::Stored(*id)) {
                    row.is_completed = !row.is_completed;
                }
            }
            Patch::Remove(id) => rows.retain(|row| row.key != RowKey::Stored(*id)),
        }
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Patch::Add { text, .. } => write!(f, "add {:?}", text),
            Patch::Toggle(id) => write!(f, "toggle {}", id),
            Patch::Remove(id) => write!(f, "remove {}", id),
        }
    }
}
