//! Navigation target resolution.

// Static pattern below is known to compile.
#![allow(clippy::expect_used)]

use regex::Regex;
use std::sync::LazyLock;

use crate::candidate::{Candidate, CandidateType};
use crate::display::DisplayEntry;
use crate::error::NavigationError;

static BLOCK_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("valid block number pattern"));

/// Resolve the console path for a candidate.
///
/// A non-empty server `url` always wins. Otherwise the path is built from the
/// candidate type; unknown types cannot be resolved.
pub fn resolve_path(candidate: &Candidate) -> Result<String, NavigationError> {
    if let Some(url) = candidate.url() {
        return Ok(url.to_string());
    }

    let id = candidate.id.as_ref();
    let path = match candidate.kind.as_str() {
        CandidateType::BLOCK => {
            let number = BLOCK_NUMBER
                .captures(&candidate.title)
                .and_then(|caps| caps.get(1))
                .map_or(id, |m| m.as_str());
            format!("/block/{}", number)
        }
        CandidateType::ACCOUNT => format!("/account/{}", id),
        CandidateType::TRANSACTION => format!("/transaction/{}", id),
        CandidateType::VALIDATOR => format!("/validator/{}", id),
        CandidateType::TRACK => format!("/tracks/{}", id),
        CandidateType::USERNAME => format!("/users/{}", candidate.title),
        CandidateType::PLAYLIST => format!("/playlists/{}", id),
        CandidateType::ALBUM => format!("/albums/{}", id),
        _ => {
            return Err(NavigationError::Unresolvable {
                kind: candidate.kind.to_string(),
                id: id.to_string(),
            })
        }
    };

    Ok(path)
}

/// Resolve a display row. Header rows are never navigable.
pub fn resolve_entry(entry: &DisplayEntry) -> Result<String, NavigationError> {
    match entry {
        DisplayEntry::Candidate(candidate) => resolve_path(candidate),
        DisplayEntry::Header(header) => Err(NavigationError::Unresolvable {
            kind: header.kind.to_string(),
            id: header.id.clone(),
        }),
    }
}
