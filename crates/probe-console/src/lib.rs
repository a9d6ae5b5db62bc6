//! Typeahead session for the Probe explorer.
//!
//! This crate provides:
//! - The interaction controller (phases, stale-response guard, no-results flash)
//! - Search backends (HTTP, offline catalog)
//! - The session driver that runs the controller on tokio
//! - A line-oriented terminal front-end

pub mod backend;
pub mod controller;
pub mod keymap;
pub mod model;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use backend::{CatalogBackend, HttpBackend, SearchBackend};
pub use controller::{Command, FetchOutcome, InteractionController, NO_RESULTS_FLASH};
pub use keymap::{action_from_key, available_keys, KeyAction};
pub use model::{NoResultsReason, Phase, SessionSnapshot, SessionState};
pub use prompt::{render_snapshot, ConsoleNavigator, PromptCommand, PromptError};
pub use session::{Navigator, Session, SessionError, SessionEvent, SessionHandle};
