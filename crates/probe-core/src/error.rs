//! Error types for Probe.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Search service errors - any of these turns into a no-results flash.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Connection, DNS, or TLS failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("Search service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not a valid search response.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Service answered with an `error` field.
    #[error("Search service error: {0}")]
    Service(String),

    /// Request did not complete in time.
    #[error("Search timed out after {duration:?}")]
    Timeout { duration: Duration },
}

/// Navigation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// Candidate has no url and its type has no path rule.
    #[error("No navigation target for {kind} '{id}'")]
    Unresolvable { kind: String, id: String },

    /// The navigator could not open a resolved path.
    #[error("Navigation to {path} failed: {reason}")]
    Rejected { path: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error reading {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    /// Parse error.
    #[error("Parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Endpoint URL is not http(s).
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}
