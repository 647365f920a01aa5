//! Single owner of the session's prospect list.
//!
//! Every mutation builds a new list and swaps it into a `watch` channel, so
//! observers always see whole, consistent snapshots and concurrent writers
//! are serialized by the channel's lock.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::model::{DraftField, ModelError, OutreachDraft, Prospect, ProspectId};

/// Immutable view of the list at one point in time.
pub type Snapshot = Arc<Vec<Prospect>>;

/// Errors from board mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    /// No prospect with that id is on the board.
    #[error("prospect {0} is not on the board")]
    NotFound(ProspectId),

    /// The record rejected the change.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Shared, copy-on-write prospect list.
#[derive(Debug, Clone)]
pub struct ProspectBoard {
    tx: Arc<watch::Sender<Snapshot>>,
}

impl Default for ProspectBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ProspectBoard {
    /// Empty board.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Vec::new()));
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to list snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Current list.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.tx.borrow())
    }

    /// Number of prospects on the board.
    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    /// True when the board holds no prospects.
    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Clone of one prospect.
    pub fn get(&self, id: &ProspectId) -> Option<Prospect> {
        self.tx.borrow().iter().find(|p| p.id() == id).cloned()
    }

    /// Replace the whole list.
    pub fn replace(&self, prospects: Vec<Prospect>) {
        debug!(count = prospects.len(), "board replaced");
        self.tx.send_replace(Arc::new(prospects));
    }

    /// Drop every prospect.
    pub fn clear(&self) {
        self.replace(Vec::new());
    }

    /// Attach a draft, replacing any existing one.
    ///
    /// # Errors
    ///
    /// [`BoardError::NotFound`] when the prospect is gone.
    pub fn attach_draft(&self, id: &ProspectId, draft: OutreachDraft) -> Result<(), BoardError> {
        self.update(id, |p| {
            p.attach_draft(draft);
            Ok(())
        })
    }

    /// Attach a draft only if the prospect has none yet.
    ///
    /// Returns `false` (and leaves the record alone) when a draft is already
    /// present.
    ///
    /// # Errors
    ///
    /// [`BoardError::NotFound`] when the prospect is gone.
    pub fn attach_draft_if_missing(
        &self,
        id: &ProspectId,
        draft: OutreachDraft,
    ) -> Result<bool, BoardError> {
        self.update(id, |p| {
            if p.has_draft() {
                return Ok(false);
            }
            p.attach_draft(draft);
            Ok(true)
        })
    }

    /// Mark a drafted prospect as contacted.
    ///
    /// # Errors
    ///
    /// [`BoardError::NotFound`], or [`BoardError::Model`] when undrafted.
    pub fn mark_contacted(&self, id: &ProspectId) -> Result<(), BoardError> {
        self.update(id, Prospect::mark_contacted)
    }

    /// Edit one field of a prospect's draft.
    ///
    /// # Errors
    ///
    /// [`BoardError::NotFound`], or [`BoardError::Model`] when undrafted.
    pub fn update_draft_field(
        &self,
        id: &ProspectId,
        field: DraftField,
        value: String,
    ) -> Result<(), BoardError> {
        self.update(id, |p| p.update_draft_field(field, value))
    }

    /// Apply `change` to a copy of the record; publish only on success.
    fn update<T>(
        &self,
        id: &ProspectId,
        change: impl FnOnce(&mut Prospect) -> Result<T, ModelError>,
    ) -> Result<T, BoardError> {
        let mut outcome = Err(BoardError::NotFound(id.clone()));
        self.tx.send_if_modified(|current| {
            let Some(index) = current.iter().position(|p| p.id() == id) else {
                return false;
            };
            let mut next: Vec<Prospect> = current.as_ref().clone();
            let Some(target) = next.get_mut(index) else {
                return false;
            };
            match change(target) {
                Ok(value) => {
                    outcome = Ok(value);
                    *current = Arc::new(next);
                    true
                }
                Err(e) => {
                    outcome = Err(BoardError::Model(e));
                    false
                }
            }
        });
        outcome
    }
}
