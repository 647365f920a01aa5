//! Outreach drafting, one prospect at a time or as a batch.
//!
//! A batch run walks an explicit [`Worklist`] of the prospects that had no
//! draft when the run started. Drafts are requested sequentially, each one
//! is published to the board as soon as it lands, and a failure only skips
//! that prospect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{BoardError, OrchestratorError, ProspectBoard};
use crate::gateway::ProspectGateway;
use crate::model::{OutreachDraft, Prospect, ProspectId};

/// Ordered cursor over the prospects a batch run will draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worklist {
    ids: Vec<ProspectId>,
    cursor: usize,
}

impl Worklist {
    /// Undrafted prospects, in board order.
    pub fn from_prospects(prospects: &[Prospect]) -> Self {
        Self {
            ids: prospects
                .iter()
                .filter(|p| !p.has_draft())
                .map(|p| p.id().clone())
                .collect(),
            cursor: 0,
        }
    }

    /// Next id to process, advancing the cursor.
    pub fn advance(&mut self) -> Option<ProspectId> {
        let id = self.ids.get(self.cursor)?.clone();
        self.cursor = self.cursor.saturating_add(1);
        Some(id)
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when there was nothing to draft.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Items already handed out.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Items not yet handed out.
    pub fn remaining(&self) -> usize {
        self.ids.len().saturating_sub(self.cursor)
    }
}

/// Live counters for a running batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchProgress {
    /// Prospects in the worklist.
    pub total: usize,
    /// Prospects processed so far.
    pub processed: usize,
    /// Drafts attached so far.
    pub drafted: usize,
    /// Drafts that failed so far.
    pub failed: usize,
}

/// One prospect the batch could not draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftFailure {
    /// Prospect that was skipped.
    pub prospect_id: ProspectId,
    /// Why.
    pub reason: String,
}

/// Outcome of a finished batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Prospects that received a draft from this run.
    pub drafted: Vec<ProspectId>,
    /// Prospects whose draft request failed.
    pub failures: Vec<DraftFailure>,
    /// Prospects removed or drafted elsewhere while the run was going.
    pub skipped: Vec<ProspectId>,
}

impl BatchReport {
    /// Prospects the run looked at.
    pub fn processed(&self) -> usize {
        self.drafted
            .len()
            .saturating_add(self.failures.len())
            .saturating_add(self.skipped.len())
    }
}

/// Clears the in-flight flag when the run ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Requests outreach drafts and writes them back to the board.
pub struct DraftOrchestrator {
    gateway: Arc<dyn ProspectGateway>,
    board: ProspectBoard,
    batch_running: AtomicBool,
    progress: watch::Sender<BatchProgress>,
}

impl std::fmt::Debug for DraftOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftOrchestrator")
            .field("batch_running", &self.is_batch_running())
            .field("progress", &*self.progress.borrow())
            .finish_non_exhaustive()
    }
}

impl DraftOrchestrator {
    /// Create an orchestrator for `board`.
    pub fn new(gateway: Arc<dyn ProspectGateway>, board: ProspectBoard) -> Self {
        let (progress, _rx) = watch::channel(BatchProgress::default());
        Self {
            gateway,
            board,
            batch_running: AtomicBool::new(false),
            progress,
        }
    }

    /// True while a batch run is going.
    pub fn is_batch_running(&self) -> bool {
        self.batch_running.load(Ordering::SeqCst)
    }

    /// Subscribe to batch progress.
    pub fn subscribe_progress(&self) -> watch::Receiver<BatchProgress> {
        self.progress.subscribe()
    }

    /// Draft one prospect and attach the result, replacing any existing
    /// draft.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::UnknownProspect`] when the id is not on the
    /// board, [`OrchestratorError::Draft`] when the request fails. A failed
    /// request leaves the record untouched.
    pub async fn draft_one(&self, id: &ProspectId) -> Result<OutreachDraft, OrchestratorError> {
        let prospect = self
            .board
            .get(id)
            .ok_or_else(|| OrchestratorError::UnknownProspect(id.clone()))?;

        let draft = self.gateway.draft(&prospect).await?;
        match self.board.attach_draft(id, draft.clone()) {
            Ok(()) => {
                info!(prospect_id = %id, "draft attached");
                Ok(draft)
            }
            Err(BoardError::NotFound(gone)) => Err(OrchestratorError::UnknownProspect(gone)),
            Err(e) => Err(e.into()),
        }
    }

    /// Draft every prospect that has no draft yet.
    ///
    /// Running it again after a full pass is a no-op. Drafts attached by
    /// [`draft_one`](Self::draft_one) during the run are never overwritten.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::BatchInFlight`] when another batch is running.
    /// Individual draft failures are reported in [`BatchReport::failures`].
    pub async fn draft_all(&self) -> Result<BatchReport, OrchestratorError> {
        if self.batch_running.swap(true, Ordering::SeqCst) {
            return Err(OrchestratorError::BatchInFlight);
        }
        let _running = InFlight(&self.batch_running);

        let mut worklist = Worklist::from_prospects(&self.board.snapshot());
        let mut report = BatchReport::default();
        let mut progress = BatchProgress {
            total: worklist.len(),
            ..BatchProgress::default()
        };
        self.progress.send_replace(progress);
        info!(total = worklist.len(), "batch draft started");

        while let Some(id) = worklist.advance() {
            match self.board.get(&id) {
                Some(prospect) if !prospect.has_draft() => {
                    self.draft_into_report(&prospect, &mut report).await;
                }
                _ => {
                    debug!(prospect_id = %id, "skipping prospect changed during batch");
                    report.skipped.push(id);
                }
            }

            progress.processed = worklist.position();
            progress.drafted = report.drafted.len();
            progress.failed = report.failures.len();
            self.progress.send_replace(progress);
        }

        info!(
            drafted = report.drafted.len(),
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            "batch draft finished"
        );
        Ok(report)
    }

    async fn draft_into_report(&self, prospect: &Prospect, report: &mut BatchReport) {
        let id = prospect.id().clone();
        match self.gateway.draft(prospect).await {
            Ok(draft) => match self.board.attach_draft_if_missing(&id, draft) {
                Ok(true) => report.drafted.push(id),
                Ok(false) | Err(_) => report.skipped.push(id),
            },
            Err(e) => {
                warn!(prospect_id = %id, error = %e, "draft failed, continuing batch");
                report.failures.push(DraftFailure {
                    prospect_id: id,
                    reason: e.to_string(),
                });
            }
        }
    }
}
