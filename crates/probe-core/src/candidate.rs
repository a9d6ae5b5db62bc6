//! Candidate types for search results.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// Candidate Identifier
// =============================================================================

/// Opaque candidate identifier.
///
/// The search service sends ids as strings, the demo catalog as numbers.
/// Both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl<'de> Deserialize<'de> for CandidateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        })
    }
}

impl From<String> for CandidateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CandidateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for CandidateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Candidate Type
// =============================================================================

/// Open set of candidate types.
///
/// The service may introduce new types at any time; grouping and header
/// labels work for any string, only path construction needs a known type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateType(String);

impl CandidateType {
    pub const BLOCK: &'static str = "block";
    pub const ACCOUNT: &'static str = "account";
    pub const TRANSACTION: &'static str = "transaction";
    pub const VALIDATOR: &'static str = "validator";
    pub const TRACK: &'static str = "track";
    pub const USERNAME: &'static str = "username";
    pub const PLAYLIST: &'static str = "playlist";
    pub const ALBUM: &'static str = "album";

    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pluralized label used for the group header of this type.
    pub fn header_label(&self) -> String {
        let known = match self.0.as_str() {
            Self::TRACK => Some("Tracks"),
            Self::USERNAME => Some("Artists"),
            Self::PLAYLIST => Some("Playlists"),
            Self::ALBUM => Some("Albums"),
            Self::BLOCK => Some("Blocks"),
            Self::ACCOUNT => Some("Accounts"),
            Self::TRANSACTION => Some("Transactions"),
            Self::VALIDATOR => Some("Validators"),
            _ => None,
        };
        if let Some(label) = known {
            return label.to_string();
        }

        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => format!("{}{}s", first.to_uppercase(), chars.as_str()),
            None => String::new(),
        }
    }
}

impl From<&str> for CandidateType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for CandidateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Candidate
// =============================================================================

/// One retrievable search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier, unique within one result set.
    pub id: CandidateId,

    /// Primary display text.
    pub title: String,

    /// Secondary display text.
    #[serde(default)]
    pub subtitle: String,

    /// Result type; drives grouping and path construction.
    #[serde(rename = "type")]
    pub kind: CandidateType,

    /// Server-supplied navigation path. Empty strings decode as `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub url: Option<String>,
}

impl Candidate {
    /// Create a candidate with required fields.
    pub fn new(
        id: impl Into<CandidateId>,
        title: impl Into<String>,
        kind: impl Into<CandidateType>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: String::new(),
            kind: kind.into(),
            url: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.url = (!url.is_empty()).then_some(url);
        self
    }

    /// Server-supplied path, if present and non-empty.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// Case-insensitive substring match against the title.
    pub fn title_matches(&self, query: &str) -> bool {
        self.title
            .to_lowercase()
            .contains(&query.trim().to_lowercase())
    }
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}
