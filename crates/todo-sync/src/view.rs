//! Optimistic View
//!
//! Two layers: the last authoritative snapshot, and the local patches
//! still waiting for the store to reflect them. The rendered rows are
//! always derived from both, never edited directly.
//!
//! A patch leaves the pending layer as soon as a snapshot reflects its
//! commit: either the snapshot lists the patch's token, or it is at or past
//! the version the commit receipt reported.

use chrono::{DateTime, Utc};

use crate::model::{ClientId, CommitReceipt, MutationToken, PlaceholderId, Snapshot, ViewRow};
use crate::patch::Patch;

/// Handle for one issued mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutationId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirmation {
    /// Remote call not answered yet
    InFlight,
    /// Store committed at this version; waiting for a snapshot that includes it
    Committed(u64),
}

#[derive(Debug, Clone)]
struct PendingMutation {
    id: MutationId,
    patch: Patch,
    issued_at: DateTime<Utc>,
    confirmation: Confirmation,
}

#[derive(Debug, Clone, Default)]
pub struct OptimisticView {
    /// Issuer of every token this view hands out
    client: ClientId,
    authoritative: Snapshot,
    /// Issue order
    pending: Vec<PendingMutation>,
    rows: Vec<ViewRow>,
    next_mutation: u64,
    next_placeholder: u64,
}

impl OptimisticView {
    pub fn new(initial: Snapshot, client: ClientId) -> Self {
        let mut view = Self {
            client,
            authoritative: initial,
            ..Default::default()
        };
        view.recompute();
        view
    }

    /// Rows to render, speculative patches included
    pub fn rows(&self) -> &[ViewRow] {
        &self.rows
    }

    pub fn authoritative(&self) -> &Snapshot {
        &self.authoritative
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows not yet completed
    pub fn active_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.is_completed).count()
    }

    pub fn next_placeholder(&mut self) -> PlaceholderId {
        let placeholder = PlaceholderId(self.next_placeholder);
        self.next_placeholder += 1;
        placeholder
    }

    /// Token the store echoes back for `id`
    pub fn token(&self, id: MutationId) -> MutationToken {
        MutationToken::new(self.client.clone(), id.0)
    }

    /// Stack a patch on top of the current view
    pub fn begin(&mut self, patch: Patch, now: DateTime<Utc>) -> MutationId {
        let id = MutationId(self.next_mutation);
        self.next_mutation += 1;
        self.pending.push(PendingMutation {
            id,
            patch,
            issued_at: now,
            confirmation: Confirmation::InFlight,
        });
        self.recompute();
        id
    }

    /// Record a successful commit. The patch stays applied until a
    /// snapshot at or past `receipt.version` arrives.
    ///
    /// Returns false if the mutation is no longer pending (e.g. expired).
    pub fn confirm(&mut self, id: MutationId, receipt: CommitReceipt) -> bool {
        if receipt.version <= self.authoritative.version {
            let known = self.pending.iter().any(|p| p.id == id);
            self.pending.retain(|p| p.id != id);
            self.recompute();
            return known;
        }
        match self.pending.iter_mut().find(|p| p.id == id) {
            Some(pending) => {
                pending.confirmation = Confirmation::Committed(receipt.version);
                true
            }
            None => false,
        }
    }

    /// Roll a failed mutation back
    pub fn reject(&mut self, id: MutationId) -> Option<Patch> {
        let index = self.pending.iter().position(|p| p.id == id)?;
        let pending = self.pending.remove(index);
        self.recompute();
        Some(pending.patch)
    }

    /// Replace the authoritative layer. Returns false for a stale snapshot.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> bool {
        if snapshot.version < self.authoritative.version {
            log::debug!(
                "ignoring stale snapshot v{} (have v{})",
                snapshot.version,
                self.authoritative.version
            );
            return false;
        }
        let client = &self.client;
        self.pending.retain(|p| {
            let reflected = match p.confirmation {
                Confirmation::Committed(committed) => committed <= snapshot.version,
                Confirmation::InFlight => false,
            };
            !reflected && !snapshot.includes(&MutationToken::new(client.clone(), p.id.0))
        });
        self.authoritative = snapshot;
        self.recompute();
        true
    }

    /// Drop every patch issued before `cutoff`, oldest first
    pub fn expire(&mut self, cutoff: DateTime<Utc>) -> Vec<(MutationId, Patch)> {
        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.issued_at < cutoff);
        self.pending = kept;
        if !expired.is_empty() {
            self.recompute();
        }
        expired.into_iter().map(|p| (p.id, p.patch)).collect()
    }

    fn recompute(&mut self) {
        let mut rows: Vec<ViewRow> = self.authoritative.todos.iter().map(ViewRow::from).collect();
        for pending in &self.pending {
            pending.patch.apply(&mut rows);
        }
        self.rows = rows;
    }
}
