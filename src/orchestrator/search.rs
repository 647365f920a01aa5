//! Single-flight discovery search.
//!
//! ```text
//! Idle | ResultsReady | Failed --submit--> Searching
//! Searching --non-empty--> ResultsReady
//! Searching --empty------> Failed(NoMatches)
//! Searching --error------> Failed(Connection)
//! ```
//!
//! Submitting while `Searching` is rejected. Submitting clears the board, so
//! results from an earlier search are never shown next to a new one.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use super::{OrchestratorError, ProspectBoard};
use crate::gateway::ProspectGateway;
use crate::model::SearchFilters;

/// Why a search produced no results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    /// The service answered but nothing usable came back.
    NoMatches,
    /// The service could not be reached or refused the call.
    Connection,
}

impl SearchFailure {
    /// Operator-facing message.
    pub fn message(self) -> &'static str {
        match self {
            Self::NoMatches => {
                "No prospects with critical service problems were detected in this area. \
                 Try broadening the search or another city."
            }
            Self::Connection => "Could not reach the intelligence service. Please retry.",
        }
    }
}

/// Observable search state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A discovery call is outstanding.
    Searching,
    /// The board holds `count` fresh prospects.
    ResultsReady {
        /// Number of prospects found.
        count: usize,
    },
    /// The last search produced nothing.
    Failed(SearchFailure),
}

impl SearchState {
    /// True while a discovery call is outstanding.
    pub fn is_searching(self) -> bool {
        matches!(self, Self::Searching)
    }
}

/// Drives discovery searches against the board.
pub struct SearchOrchestrator {
    gateway: Arc<dyn ProspectGateway>,
    board: ProspectBoard,
    state: Arc<watch::Sender<SearchState>>,
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("state", &*self.state.borrow())
            .field("board_len", &self.board.len())
            .finish_non_exhaustive()
    }
}

/// Resets an abandoned search back to `Idle`.
struct SearchGuard {
    state: Arc<watch::Sender<SearchState>>,
    finished: bool,
}

impl Drop for SearchGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.state.send_if_modified(|s| {
                if s.is_searching() {
                    *s = SearchState::Idle;
                    true
                } else {
                    false
                }
            });
        }
    }
}

impl SearchOrchestrator {
    /// Create an orchestrator in the `Idle` state.
    pub fn new(gateway: Arc<dyn ProspectGateway>, board: ProspectBoard) -> Self {
        let (state, _rx) = watch::channel(SearchState::Idle);
        Self {
            gateway,
            board,
            state: Arc::new(state),
        }
    }

    /// Current state.
    pub fn state(&self) -> SearchState {
        *self.state.borrow()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Board this orchestrator fills.
    pub fn board(&self) -> &ProspectBoard {
        &self.board
    }

    /// Run one search and return the state it settled in.
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::InvalidFilters`] for blank industry or location,
    /// [`OrchestratorError::SearchInFlight`] while another search runs. In
    /// both cases neither the state nor the board changes.
    pub async fn submit(&self, filters: SearchFilters) -> Result<SearchState, OrchestratorError> {
        if filters.industry.trim().is_empty() {
            return Err(OrchestratorError::InvalidFilters("industry is empty".to_owned()));
        }
        if filters.location.trim().is_empty() {
            return Err(OrchestratorError::InvalidFilters("location is empty".to_owned()));
        }

        let mut entered = false;
        self.state.send_if_modified(|s| {
            if s.is_searching() {
                return false;
            }
            *s = SearchState::Searching;
            entered = true;
            true
        });
        if !entered {
            return Err(OrchestratorError::SearchInFlight);
        }
        let mut guard = SearchGuard {
            state: Arc::clone(&self.state),
            finished: false,
        };

        self.board.clear();
        info!(industry = %filters.industry, location = %filters.location, "search submitted");

        let next = match self.gateway.discover(&filters).await {
            Ok(prospects) if prospects.is_empty() => {
                info!("search finished without matches");
                SearchState::Failed(SearchFailure::NoMatches)
            }
            Ok(prospects) => {
                let count = prospects.len();
                self.board.replace(prospects);
                info!(count, "search results ready");
                SearchState::ResultsReady { count }
            }
            Err(e) => {
                warn!(error = %e, "search failed");
                SearchState::Failed(SearchFailure::Connection)
            }
        };

        self.state.send_replace(next);
        guard.finished = true;
        Ok(next)
    }
}
