//! Session driver.
//!
//! Runs an [`InteractionController`] on the tokio runtime. Events from the
//! front-end and from spawned work (debounce timers, searches, flash timers)
//! are funnelled through one queue, so the controller is only ever touched
//! from the session task. State changes are broadcast via `tokio::sync::watch`.
//!
//! A snapshot is published after every event, and once more just before a
//! navigation, so the `Selecting` state is visible while the navigator runs.

use std::sync::Arc;
use std::time::Duration;

use probe_core::{NavigationError, TypeaheadConfig};
use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::backend::SearchBackend;
use crate::controller::{Command, FetchOutcome, InteractionController};
use crate::model::SessionSnapshot;

// =============================================================================
// Navigator
// =============================================================================

/// Opens resolved console paths.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str) -> Result<(), NavigationError>;
}

// =============================================================================
// Events
// =============================================================================

/// Everything the session task reacts to.
#[derive(Debug)]
pub enum SessionEvent {
    Input(String),
    Select(String),
    Keydown(String),
    DebounceElapsed { query: String, generation: u64 },
    FetchComplete { generation: u64, outcome: FetchOutcome },
    FlashElapsed { token: u64 },
    Unmount,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session has ended")]
    Closed,
}

// =============================================================================
// Session
// =============================================================================

/// The session task. Create with [`Session::new`] and drive with [`Session::run`].
pub struct Session {
    controller: InteractionController,
    backend: Arc<dyn SearchBackend>,
    navigator: Arc<dyn Navigator>,
    debounce: Duration,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    state_tx: watch::Sender<SessionSnapshot>,
}

impl Session {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        navigator: Arc<dyn Navigator>,
        config: &TypeaheadConfig,
    ) -> (Self, SessionHandle) {
        let controller =
            InteractionController::new().with_widen_mixed_intent(config.widen_mixed_intent);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(controller.snapshot());

        let handle = SessionHandle {
            events: events_tx.clone(),
            state: state_rx,
        };

        let session = Self {
            controller,
            backend,
            navigator,
            debounce: config.debounce(),
            events_tx,
            events_rx,
            state_tx,
        };

        (session, handle)
    }

    /// Process events until the session is unmounted.
    pub async fn run(mut self) {
        while let Some(event) = self.events_rx.recv().await {
            let unmount = matches!(event, SessionEvent::Unmount);
            self.handle_event(event);
            self.publish();
            if unmount {
                break;
            }
        }
        tracing::debug!("Session ended");
    }

    fn handle_event(&mut self, event: SessionEvent) {
        let commands = match event {
            SessionEvent::Input(text) => self.controller.on_input(text),
            SessionEvent::Select(id) => self.controller.on_select(&id),
            SessionEvent::Keydown(key) => self.controller.on_keydown(&key),
            SessionEvent::DebounceElapsed { query, generation } => {
                self.start_search(query, generation);
                Vec::new()
            }
            SessionEvent::FetchComplete {
                generation,
                outcome,
            } => self.controller.on_fetch_complete(generation, outcome),
            SessionEvent::FlashElapsed { token } => self.controller.on_flash_elapsed(token),
            SessionEvent::Unmount => {
                self.controller.unmount();
                Vec::new()
            }
        };

        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Fetch { query, generation } => {
                let events = self.events_tx.clone();
                let debounce = self.debounce;
                tokio::spawn(async move {
                    if !debounce.is_zero() {
                        tokio::time::sleep(debounce).await;
                    }
                    let _ = events.send(SessionEvent::DebounceElapsed { query, generation });
                });
            }
            Command::ScheduleFlashReset { token, after } => {
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = events.send(SessionEvent::FlashElapsed { token });
                });
            }
            Command::Navigate { path } => {
                // Subscribers see `Selecting` and the rewritten query first
                self.publish();
                match self.navigator.navigate(&path) {
                    Ok(()) => self.controller.on_navigation_finished(),
                    Err(e) => {
                        tracing::warn!("{}", e);
                        self.controller.abort_selection();
                    }
                }
            }
        }
    }

    fn start_search(&self, query: String, generation: u64) {
        // Superseded while debouncing
        if !self.controller.is_current(generation) {
            tracing::debug!("start_search: generation {} superseded", generation);
            return;
        }

        let events = self.events_tx.clone();
        let search = self.backend.search(query);
        tokio::spawn(async move {
            let outcome = search.await;
            let _ = events.send(SessionEvent::FetchComplete {
                generation,
                outcome,
            });
        });
    }

    fn publish(&self) {
        let snapshot = self.controller.snapshot();
        self.state_tx.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Front-end side of a session. Dropping it unmounts the session.
pub struct SessionHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
    state: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// The query text changed.
    pub fn input(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(SessionEvent::Input(text.into()))
    }

    /// A candidate was clicked.
    pub fn select(&self, candidate_id: impl Into<String>) -> Result<(), SessionError> {
        self.send(SessionEvent::Select(candidate_id.into()))
    }

    /// A key was pressed.
    pub fn keydown(&self, key: impl Into<String>) -> Result<(), SessionError> {
        self.send(SessionEvent::Keydown(key.into()))
    }

    /// Subscribe to state changes. Clone the receiver for each subscriber.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.clone()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    fn send(&self, event: SessionEvent) -> Result<(), SessionError> {
        self.events.send(event).map_err(|_| SessionError::Closed)
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        let _ = self.events.send(SessionEvent::Unmount);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::model::{NoResultsReason, Phase};
    use mockall::predicate::eq;
    use parking_lot::Mutex;
    use probe_core::{Candidate, FetchError, IntentLabel};
    use tokio::task::JoinHandle;
    use tokio::time::Instant;

    fn accepting_navigator() -> MockNavigator {
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().returning(|_| Ok(()));
        navigator
    }

    fn start(
        backend: MockBackend,
        navigator: MockNavigator,
    ) -> (SessionHandle, Arc<MockBackend>, JoinHandle<()>) {
        let backend = Arc::new(backend);
        let (session, handle) = Session::new(
            backend.clone(),
            Arc::new(navigator),
            &TypeaheadConfig::default(),
        );
        let task = tokio::spawn(session.run());
        (handle, backend, task)
    }

    fn titles(snapshot: &SessionSnapshot) -> Vec<String> {
        snapshot
            .display_list
            .candidates()
            .map(|c| c.title.clone())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_shows_grouped_results() {
        let backend = MockBackend::new().with_results(
            "12345",
            vec![Candidate::new("12345", "Block #12345", "block")],
        );
        let (handle, _backend, _task) = start(backend, accepting_navigator());
        let mut state = handle.subscribe();

        handle.input("12345").unwrap();
        let snapshot = state
            .wait_for(|s| s.phase == Phase::Showing)
            .await
            .unwrap()
            .clone();

        assert!(snapshot.is_open);
        assert_eq!(snapshot.intent, IntentLabel::Block);
        assert_eq!(snapshot.display_list.len(), 2);
        assert!(snapshot.display_list.entries()[0].is_header());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_sends_only_latest_query() {
        let backend = MockBackend::new()
            .with_results("abc", vec![Candidate::new("1", "abc track", "track")]);
        let (handle, backend, _task) = start(backend, accepting_navigator());
        let mut state = handle.subscribe();

        handle.input("a").unwrap();
        handle.input("ab").unwrap();
        handle.input("abc").unwrap();
        state.wait_for(|s| s.phase == Phase::Showing).await.unwrap();

        assert_eq!(backend.calls(), vec!["abc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_older_response_is_discarded() {
        let backend = MockBackend::new()
            .with_results("0x12", vec![Candidate::new("a", "0x12 old", "account")])
            .with_query_delay("0x12", Duration::from_millis(300))
            .with_results("0x123", vec![Candidate::new("b", "0x123 new", "account")])
            .with_query_delay("0x123", Duration::from_millis(50));
        let (handle, backend, _task) = start(backend, accepting_navigator());
        let mut state = handle.subscribe();

        handle.input("0x12").unwrap();
        // Let the first search go out before typing on
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.input("0x123").unwrap();

        state.wait_for(|s| s.phase == Phase::Showing).await.unwrap();
        assert_eq!(titles(&handle.snapshot()), vec!["0x123 new"]);

        // The older response lands after the newer one
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(titles(&handle.snapshot()), vec!["0x123 new"]);
        assert_eq!(backend.calls(), vec!["0x12", "0x123"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_query_flashes_for_500ms() {
        let (handle, backend, _task) = start(MockBackend::new(), accepting_navigator());
        let mut state = handle.subscribe();

        handle.input("###").unwrap();
        let snapshot = state
            .wait_for(|s| s.no_results_flash)
            .await
            .unwrap()
            .clone();
        assert_eq!(
            snapshot.no_results_reason,
            Some(NoResultsReason::ClassificationReject)
        );
        assert!(!snapshot.is_open);

        let start = Instant::now();
        state.wait_for(|s| !s.no_results_flash).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(handle.snapshot().phase, Phase::Idle);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_flashes() {
        let backend = MockBackend::new().with_error(
            "broken",
            FetchError::Status {
                status: 500,
                body: "{\"error\":\"Search failed\"}".to_string(),
            },
        );
        let (handle, _backend, _task) = start(backend, accepting_navigator());
        let mut state = handle.subscribe();

        handle.input("broken").unwrap();
        let snapshot = state
            .wait_for(|s| s.no_results_flash)
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.no_results_reason, Some(NoResultsReason::FetchFailure));
        assert!(snapshot.display_list.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_navigates_and_resets() {
        let backend = MockBackend::new().with_results(
            "12345",
            vec![Candidate::new("12345", "Block #12345", "block")],
        );
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .with(eq("/block/12345"))
            .times(1)
            .returning(|_| Ok(()));
        let (handle, _backend, task) = start(backend, navigator);
        let mut state = handle.subscribe();

        handle.input("12345").unwrap();
        state.wait_for(|s| s.phase == Phase::Showing).await.unwrap();
        handle.keydown("Enter").unwrap();

        let snapshot = state
            .wait_for(|s| s.phase == Phase::Idle && s.query.is_empty())
            .await
            .unwrap()
            .clone();
        assert!(snapshot.display_list.is_empty());

        // Mock expectations are checked when the session drops the navigator
        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_selecting_is_published_before_navigation() {
        let backend = Arc::new(MockBackend::new().with_results(
            "12345",
            vec![Candidate::new("12345", "Block #12345", "block")],
        ));

        // Filled in once the session exists; read by the navigator
        let watched: Arc<Mutex<Option<watch::Receiver<SessionSnapshot>>>> =
            Arc::new(Mutex::new(None));
        let seen: Arc<Mutex<Vec<(Phase, String)>>> = Arc::new(Mutex::new(Vec::new()));

        let mut navigator = MockNavigator::new();
        {
            let watched = watched.clone();
            let seen = seen.clone();
            navigator.expect_navigate().times(1).returning(move |_| {
                if let Some(state) = watched.lock().as_ref() {
                    let snapshot = state.borrow();
                    seen.lock().push((snapshot.phase, snapshot.query.clone()));
                }
                Ok(())
            });
        }

        let (session, handle) =
            Session::new(backend, Arc::new(navigator), &TypeaheadConfig::default());
        *watched.lock() = Some(handle.subscribe());
        let _task = tokio::spawn(session.run());
        let mut state = handle.subscribe();

        handle.input("12345").unwrap();
        state.wait_for(|s| s.phase == Phase::Showing).await.unwrap();
        handle.keydown("Enter").unwrap();
        state
            .wait_for(|s| s.phase == Phase::Idle && s.query.is_empty())
            .await
            .unwrap();

        assert_eq!(
            *seen.lock(),
            vec![(Phase::Selecting, "Block #12345".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_navigation_returns_to_idle() {
        let backend = MockBackend::new().with_results(
            "12345",
            vec![Candidate::new("12345", "Block #12345", "block")],
        );
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().times(1).returning(|path| {
            Err(NavigationError::Rejected {
                path: path.to_string(),
                reason: "no window".to_string(),
            })
        });
        let (handle, backend, _task) = start(backend, navigator);
        let mut state = handle.subscribe();

        handle.input("12345").unwrap();
        state.wait_for(|s| s.phase == Phase::Showing).await.unwrap();
        handle.select("12345").unwrap();

        let snapshot = state
            .wait_for(|s| s.phase == Phase::Idle)
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.query, "Block #12345");
        assert!(!snapshot.is_open);

        // The rewritten query did not trigger a search
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(backend.calls(), vec!["12345"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_ends_session() {
        let backend = MockBackend::new().with_delay(Duration::from_millis(100));
        let (handle, _backend, task) = start(backend, accepting_navigator());
        let state = handle.subscribe();

        handle.input("abc").unwrap();
        drop(handle);
        task.await.unwrap();

        assert_eq!(state.borrow().phase, Phase::Idle);
        assert!(state.borrow().query.is_empty());
    }
}
