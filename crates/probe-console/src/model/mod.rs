//! State model for the typeahead session.
//!
//! This module contains the session state and the snapshot handed to the
//! presentation layer. All types are runtime-independent for testability.

mod state;

pub use state::{NoResultsReason, Phase, SessionSnapshot, SessionState};
