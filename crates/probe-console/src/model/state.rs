//! Session state for one typeahead widget.
//!
//! These types are runtime-independent so the controller can be tested
//! without spawning anything.

use probe_core::{Candidate, DisplayList, IntentLabel};
use serde::Serialize;

// =============================================================================
// Phase State Machine
// =============================================================================

/// Where the widget is in its interaction cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No query, nothing shown.
    #[default]
    Idle,
    /// A search is in flight.
    Loading,
    /// Results are displayed.
    Showing,
    /// Short "no results" flash before returning to idle.
    NoResults,
    /// A candidate was chosen; input is ignored until navigation ends.
    Selecting,
}

/// Why the no-results flash fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoResultsReason {
    /// The query matched no classification rule; no search was sent.
    ClassificationReject,
    /// The search service failed.
    FetchFailure,
    /// The search succeeded with zero candidates, or confirm found nothing.
    EmptyResult,
}

// =============================================================================
// Session State
// =============================================================================

/// Everything the interaction controller owns.
#[derive(Debug, Default)]
pub struct SessionState {
    // -------------------------------------------------------------------------
    // Search State
    // -------------------------------------------------------------------------
    /// Latest query text.
    pub query: String,

    /// Intent inferred from the query.
    pub intent: IntentLabel,

    /// Grouped results.
    pub display: DisplayList,

    /// Whether a search is in progress.
    pub is_loading: bool,

    /// Generation of the latest issued search. Only a completion carrying
    /// this value is applied.
    pub request_generation: u64,

    // -------------------------------------------------------------------------
    // Panel State
    // -------------------------------------------------------------------------
    pub phase: Phase,

    /// Whether the suggestion panel is visible.
    pub is_open: bool,

    pub no_results_flash: bool,

    pub no_results_reason: Option<NoResultsReason>,

    /// Latest flash timer id. Older timers are ignored when they fire.
    pub flash_token: u64,

    // -------------------------------------------------------------------------
    // Selection State
    // -------------------------------------------------------------------------
    /// Index into the selectable candidates.
    pub highlighted: usize,

    /// Set for the whole of `Selecting`. Input is ignored while it is set,
    /// so the query rewrite from a selection never starts a search.
    pub suppress_next_fetch: bool,
}

impl SessionState {
    /// Fresh state that keeps the counters moving forward, so completions
    /// and timers from before the reset stay stale.
    pub fn reset_from(previous: &SessionState) -> Self {
        Self {
            request_generation: previous.request_generation + 1,
            flash_token: previous.flash_token + 1,
            ..Self::default()
        }
    }

    /// Drop the results and close the panel.
    pub fn clear_results(&mut self) {
        self.display = DisplayList::default();
        self.highlighted = 0;
        self.is_open = false;
        self.is_loading = false;
    }

    /// Candidate under the highlight cursor.
    pub fn highlighted_candidate(&self) -> Option<&Candidate> {
        self.display.candidate_at(self.highlighted)
    }

    /// Move highlight up.
    pub fn cursor_up(&mut self) {
        if self.highlighted > 0 {
            self.highlighted -= 1;
        }
    }

    /// Move highlight down.
    pub fn cursor_down(&mut self) {
        if self.highlighted + 1 < self.display.candidate_count() {
            self.highlighted += 1;
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            query: self.query.clone(),
            intent: self.intent,
            display_list: self.display.clone(),
            is_open: self.is_open,
            is_loading: self.is_loading,
            no_results_flash: self.no_results_flash,
            no_results_reason: self.no_results_reason,
            phase: self.phase,
            highlighted: self.highlighted_candidate().map(|c| c.id.to_string()),
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only view of the session handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub query: String,
    pub intent: IntentLabel,
    pub display_list: DisplayList,
    pub is_open: bool,
    pub is_loading: bool,
    pub no_results_flash: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_results_reason: Option<NoResultsReason>,
    pub phase: Phase,
    /// Id of the highlighted candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================
