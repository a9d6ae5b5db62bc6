//! Core types for the Probe explorer typeahead.
//!
//! This crate holds the pure, synchronous half of the search pipeline:
//! - Candidate types as returned by the search service
//! - Query classification
//! - Grouping candidates into a display list with type headers
//! - Resolving a chosen candidate to a console path
//! - Configuration and error types

mod candidate;
mod config;
mod display;
mod error;
mod intent;
mod navigation;

pub use candidate::{Candidate, CandidateId, CandidateType};
pub use config::{
    config_dir, config_path, load_config, ConsoleConfig, EndpointConfig, ProbeConfig,
    TypeaheadConfig, ENDPOINT_ENV,
};
pub use display::{group, DisplayEntry, DisplayList, HeaderEntry};
pub use error::{ConfigError, FetchError, NavigationError};
pub use intent::{classify, classify_query, Classification, IntentLabel};
pub use navigation::{resolve_entry, resolve_path};
