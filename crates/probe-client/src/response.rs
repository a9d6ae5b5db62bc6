//! Wire format of the `/search` endpoint.
//!
//! ```text
//! 200 {"results": [{"id", "title", "subtitle", "type", "url"}, ...]}
//! 500 {"error": "Search failed"}
//! ```

use probe_core::{Candidate, FetchError};
use serde::Deserialize;

/// Body of a `/search` response.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    /// Missing or `null` means no results.
    #[serde(default)]
    pub results: Option<Vec<Candidate>>,

    #[serde(default)]
    pub error: Option<String>,
}

impl SearchResponse {
    /// An `error` field wins over any results sent alongside it.
    pub fn into_candidates(self) -> Result<Vec<Candidate>, FetchError> {
        match self.error {
            Some(error) => Err(FetchError::Service(error)),
            None => Ok(self.results.unwrap_or_default()),
        }
    }
}

/// Decode a response body into candidates.
pub fn decode(body: &str) -> Result<Vec<Candidate>, FetchError> {
    serde_json::from_str::<SearchResponse>(body)
        .map_err(|e| FetchError::Decode(e.to_string()))?
        .into_candidates()
}
