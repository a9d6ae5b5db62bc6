//! Interaction controller for the typeahead widget.
//!
//! The controller is a synchronous state machine. Each event handler updates
//! the owned [`SessionState`] and returns the side effects it wants performed
//! as [`Command`]s; the session driver executes them and feeds completions
//! back in as further events.
//!
//! ## Transitions
//!
//! ```text
//!            input("")                        input(q), q classifiable
//!   any ─────────────────▶ Idle     Idle/Showing/NoResults ──────────────▶ Loading
//!
//!   Loading ── fetch ok, non-empty, current gen ──▶ Showing
//!   Loading ── fetch empty / failed, current gen ─▶ NoResults ── 500 ms ──▶ Idle
//!   any ────── input rejected by classifier ──────▶ NoResults
//!   Showing ── select / confirm ──────────────────▶ Selecting ── navigated ─▶ (reset)
//!                                                    │
//!                                                    └─ unresolvable / aborted ─▶ Idle
//! ```
//!
//! Completions whose generation is not the current one are dropped. Every
//! transition that abandons a search bumps the generation, so a slow response
//! can never overwrite newer state.

use std::time::Duration;

use probe_core::{
    classify, classify_query, group, resolve_path, Candidate, Classification, FetchError,
    IntentLabel,
};

use crate::keymap::{action_from_key, KeyAction};
use crate::model::{NoResultsReason, Phase, SessionSnapshot, SessionState};

/// How long the no-results flash stays on.
pub const NO_RESULTS_FLASH: Duration = Duration::from_millis(500);

/// Result of one search call.
pub type FetchOutcome = Result<Vec<Candidate>, FetchError>;

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search for `query`; report back with the same generation.
    Fetch { query: String, generation: u64 },

    /// Report `token` back after `after` has elapsed.
    ScheduleFlashReset { token: u64, after: Duration },

    /// Open a resolved console path.
    Navigate { path: String },
}

/// Owner of the session state.
#[derive(Debug, Default)]
pub struct InteractionController {
    state: SessionState,
    widen_mixed_intent: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `All` when applied results span more than one type.
    pub fn with_widen_mixed_intent(mut self, widen: bool) -> Self {
        self.widen_mixed_intent = widen;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    /// Whether a completion for `generation` would still be applied.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.state.request_generation
    }

    // -------------------------------------------------------------------------
    // External Events
    // -------------------------------------------------------------------------

    /// The query text changed.
    pub fn on_input(&mut self, text: impl Into<String>) -> Vec<Command> {
        // Set for the whole of `Selecting`, cleared on every way out
        if self.state.suppress_next_fetch {
            tracing::debug!("on_input: suppressed during selection");
            return Vec::new();
        }

        self.state.query = text.into();

        if self.state.query.trim().is_empty() {
            self.enter_idle();
            self.clear_flash();
            return Vec::new();
        }

        match classify_query(&self.state.query) {
            Classification::Reject => {
                tracing::debug!("on_input: {:?} rejected by classifier", self.state.query);
                self.state.intent = IntentLabel::Unset;
                self.flash(NoResultsReason::ClassificationReject)
            }
            Classification::Intent(intent) => {
                self.state.intent = intent;
                self.state.request_generation += 1;
                self.clear_flash();
                self.state.phase = Phase::Loading;
                self.state.is_loading = true;
                // Keep showing previous results while the new search runs
                self.state.is_open = !self.state.display.is_empty();

                vec![Command::Fetch {
                    query: self.state.query.clone(),
                    generation: self.state.request_generation,
                }]
            }
        }
    }

    /// A candidate row was clicked.
    pub fn on_select(&mut self, candidate_id: &str) -> Vec<Command> {
        if self.state.phase == Phase::Selecting {
            return Vec::new();
        }

        let Some(candidate) = self.state.display.find(candidate_id).cloned() else {
            tracing::debug!("on_select: no selectable candidate {:?}", candidate_id);
            return Vec::new();
        };

        self.select(candidate)
    }

    /// A key was pressed in the search box.
    pub fn on_keydown(&mut self, key: &str) -> Vec<Command> {
        let Some(action) = action_from_key(key) else {
            return Vec::new();
        };

        if self.state.phase == Phase::Selecting {
            if action == KeyAction::Dismiss {
                self.abort_selection();
            }
            return Vec::new();
        }

        match action {
            KeyAction::Confirm => self.confirm(),
            KeyAction::CursorUp => {
                self.state.cursor_up();
                Vec::new()
            }
            KeyAction::CursorDown => {
                self.state.cursor_down();
                Vec::new()
            }
            KeyAction::Dismiss => {
                self.enter_idle();
                Vec::new()
            }
        }
    }

    // -------------------------------------------------------------------------
    // Driver Events
    // -------------------------------------------------------------------------

    /// A search finished.
    pub fn on_fetch_complete(&mut self, generation: u64, outcome: FetchOutcome) -> Vec<Command> {
        if !self.is_current(generation) {
            tracing::debug!(
                "on_fetch_complete: discarding generation {} (current {})",
                generation,
                self.state.request_generation
            );
            return Vec::new();
        }

        self.state.is_loading = false;

        match outcome {
            Ok(candidates) if !candidates.is_empty() => {
                tracing::debug!(
                    "on_fetch_complete: {} candidates for {:?}",
                    candidates.len(),
                    self.state.query
                );
                let display = group(candidates);
                let intent = classify(&self.state.query);
                self.state.intent = if self.widen_mixed_intent && display.type_count() > 1 {
                    IntentLabel::All
                } else {
                    intent
                };
                self.state.display = display;
                self.state.highlighted = 0;
                self.state.is_open = true;
                self.state.phase = Phase::Showing;
                Vec::new()
            }
            Ok(_) => self.flash(NoResultsReason::EmptyResult),
            Err(e) => {
                tracing::warn!("Search for {:?} failed: {}", self.state.query, e);
                self.flash(NoResultsReason::FetchFailure)
            }
        }
    }

    /// A flash timer fired.
    pub fn on_flash_elapsed(&mut self, token: u64) -> Vec<Command> {
        if token != self.state.flash_token {
            return Vec::new();
        }

        self.state.no_results_flash = false;
        self.state.no_results_reason = None;
        if self.state.phase == Phase::NoResults {
            self.state.phase = Phase::Idle;
        }
        Vec::new()
    }

    /// The navigator opened the selected path. Ends the session.
    pub fn on_navigation_finished(&mut self) {
        if self.state.phase != Phase::Selecting {
            return;
        }
        tracing::debug!("on_navigation_finished: session reset");
        self.unmount();
    }

    /// Navigation did not happen; return to idle and accept input again.
    pub fn abort_selection(&mut self) {
        if self.state.phase != Phase::Selecting {
            return;
        }
        self.state.suppress_next_fetch = false;
        self.enter_idle();
    }

    /// The widget went away. Pending completions and timers become stale.
    pub fn unmount(&mut self) {
        self.state = SessionState::reset_from(&self.state);
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn confirm(&mut self) -> Vec<Command> {
        if let Some(candidate) = self.state.highlighted_candidate().cloned() {
            return self.select(candidate);
        }

        if self.state.query.trim().is_empty() {
            return Vec::new();
        }

        self.flash(NoResultsReason::EmptyResult)
    }

    fn select(&mut self, candidate: Candidate) -> Vec<Command> {
        // Guard first: the query rewrite below must not start a search
        self.state.phase = Phase::Selecting;
        self.state.suppress_next_fetch = true;
        self.invalidate_pending();
        self.state.is_loading = false;
        self.state.query = candidate.title.clone();

        match resolve_path(&candidate) {
            Ok(path) => {
                tracing::info!("Selected {} '{}' -> {}", candidate.kind, candidate.id, path);
                self.state.is_open = false;
                vec![Command::Navigate { path }]
            }
            Err(e) => {
                tracing::debug!("select: {}; closing panel", e);
                self.state.suppress_next_fetch = false;
                self.enter_idle();
                Vec::new()
            }
        }
    }

    fn flash(&mut self, reason: NoResultsReason) -> Vec<Command> {
        tracing::debug!("No results ({:?}) for {:?}", reason, self.state.query);
        self.invalidate_pending();
        self.state.clear_results();
        self.state.phase = Phase::NoResults;
        self.state.no_results_flash = true;
        self.state.no_results_reason = Some(reason);
        self.state.flash_token += 1;

        vec![Command::ScheduleFlashReset {
            token: self.state.flash_token,
            after: NO_RESULTS_FLASH,
        }]
    }

    /// Switch the flash off and make its pending timer stale.
    fn clear_flash(&mut self) {
        self.state.no_results_flash = false;
        self.state.no_results_reason = None;
        self.state.flash_token += 1;
    }

    fn enter_idle(&mut self) {
        self.invalidate_pending();
        self.state.clear_results();
        self.state.intent = IntentLabel::Unset;
        self.state.phase = Phase::Idle;
    }

    fn invalidate_pending(&mut self) {
        self.state.request_generation += 1;
    }
}

// =============================================================================
// Tests
// =============================================================================
