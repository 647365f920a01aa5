//! Session orchestration: the shared prospect board, the single-flight
//! search state machine, and draft generation (single and batch).

pub mod batch;
pub mod board;
pub mod search;

pub use batch::{BatchProgress, BatchReport, DraftFailure, DraftOrchestrator, Worklist};
pub use board::{BoardError, ProspectBoard, Snapshot};
pub use search::{SearchFailure, SearchOrchestrator, SearchState};

use crate::gateway::GatewayError;
use crate::model::ProspectId;

/// Errors surfaced to the operator by the orchestrators.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// A search is already running; the new one was rejected.
    #[error("a search is already in progress")]
    SearchInFlight,

    /// A batch draft run is already running; the new one was rejected.
    #[error("a batch draft is already in progress")]
    BatchInFlight,

    /// Industry or location was blank.
    #[error("invalid search filters: {0}")]
    InvalidFilters(String),

    /// The prospect is no longer on the board.
    #[error("prospect {0} not found")]
    UnknownProspect(ProspectId),

    /// A single draft request failed.
    #[error(transparent)]
    Draft(#[from] GatewayError),

    /// The board rejected a mutation.
    #[error(transparent)]
    Board(#[from] BoardError),
}
