//! Shared Models
//!
//! Records exchanged between the store and its clients, plus the
//! client-only row types used for rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identity of a todo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local marker for a todo that only exists as an optimistic add.
///
/// Not `Serialize`: it never leaves the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceholderId(pub(crate) u64);

impl fmt::Display for PlaceholderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pending-{}", self.0)
    }
}

/// A persisted todo record (matches the store's wire format)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub is_completed: bool,
    /// Milliseconds since epoch, assigned by the store
    pub created_at: i64,
}

/// How many of the latest commit tokens a snapshot carries
pub const COMMIT_LOG_LEN: usize = 64;

/// Identity of one client of the store (one per window).
///
/// Must be unique among the clients attached to the same store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sent with every mutation; echoed in the snapshots that include its commit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutationToken {
    pub client: ClientId,
    /// Per-client issue counter
    pub seq: u64,
}

impl MutationToken {
    pub fn new(client: ClientId, seq: u64) -> Self {
        Self { client, seq }
    }
}

impl fmt::Display for MutationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.client, self.seq)
    }
}

/// Full result of the "all todos" query at one commit version
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Store commit counter when the snapshot was read
    pub version: u64,
    /// Todos in store order
    pub todos: Vec<Todo>,
    /// Tokens of the latest commits up to `version`, oldest first,
    /// at most `COMMIT_LOG_LEN` of them
    #[serde(default)]
    pub applied: Vec<MutationToken>,
}

impl Snapshot {
    pub fn new(version: u64, todos: Vec<Todo>) -> Self {
        Self {
            version,
            todos,
            applied: Vec::new(),
        }
    }

    pub fn with_applied(mut self, applied: Vec<MutationToken>) -> Self {
        self.applied = applied;
        self
    }

    /// Whether the commit made for `token` is reflected here
    pub fn includes(&self, token: &MutationToken) -> bool {
        self.applied.contains(token)
    }
}

/// Answer to a successful mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Commit counter produced by this write
    pub version: u64,
}

/// Identity of a rendered row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKey {
    Stored(TodoId),
    Pending(PlaceholderId),
}

impl RowKey {
    /// Store id, if the row is backed by a persisted record
    pub fn stored(&self) -> Option<TodoId> {
        match self {
            RowKey::Stored(id) => Some(*id),
            RowKey::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RowKey::Pending(_))
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Stored(id) => write!(f, "{}", id),
            RowKey::Pending(placeholder) => write!(f, "{}", placeholder),
        }
    }
}

/// One row of the (possibly speculative) view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub key: RowKey,
    pub text: String,
    pub is_completed: bool,
}

impl From<&Todo> for ViewRow {
    fn from(todo: &Todo) -> Self {
        Self {
            key: RowKey::Stored(todo.id),
            text: todo.text.clone(),
            is_completed: todo.is_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_wire_format() {
        let todo = Todo {
            id: TodoId(7),
            text: "buy milk".to_string(),
            is_completed: false,
            created_at: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&todo).unwrap();
        assert_eq!(
            json,
            r#"{"id":7,"text":"buy milk","isCompleted":false,"createdAt":1700000000000}"#
        );
    }

    #[test]
    fn test_snapshot_wire_format() {
        let snapshot = Snapshot::new(3, vec![]).with_applied(vec![MutationToken::new(ClientId::from("main"), 4)]);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"version":3,"todos":[],"applied":[{"client":"main","seq":4}]}"#);

        let bare: Snapshot = serde_json::from_str(r#"{"version":1,"todos":[]}"#).unwrap();
        assert!(bare.applied.is_empty());
    }

    #[test]
    fn test_includes_matches_client_and_seq() {
        let snapshot = Snapshot::new(2, vec![]).with_applied(vec![MutationToken::new(ClientId::from("main"), 0)]);
        assert!(snapshot.includes(&MutationToken::new(ClientId::from("main"), 0)));
        assert!(!snapshot.includes(&MutationToken::new(ClientId::from("todo-1"), 0)));
        assert!(!snapshot.includes(&MutationToken::new(ClientId::from("main"), 1)));
    }

    #[test]
    fn test_row_key_stored() {
        assert_eq!(RowKey::Stored(TodoId(3)).stored(), Some(TodoId(3)));
        assert!(RowKey::Pending(PlaceholderId(1)).is_pending());
        assert_eq!(RowKey::Pending(PlaceholderId(1)).stored(), None);
    }
}
