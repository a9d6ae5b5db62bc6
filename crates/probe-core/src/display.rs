//! Display list construction.
//!
//! The service returns a flat list of candidates. The panel shows them in
//! contiguous per-type sections, each introduced by a non-selectable header,
//! with sections ordered by the first appearance of their type.

use std::collections::HashMap;

use serde::Serialize;

use crate::candidate::{Candidate, CandidateType};

/// Synthetic header row that starts a type group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderEntry {
    /// Always `header-{type}`.
    pub id: String,
    is_header: bool,
    /// Pluralized type label.
    pub title: String,
    #[serde(rename = "type")]
    pub kind: CandidateType,
}

impl HeaderEntry {
    pub fn new(kind: CandidateType) -> Self {
        Self {
            id: format!("header-{}", kind),
            is_header: true,
            title: kind.header_label(),
            kind,
        }
    }
}

/// A row in the display list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayEntry {
    Header(HeaderEntry),
    Candidate(Candidate),
}

impl DisplayEntry {
    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header(_))
    }

    pub fn kind(&self) -> &CandidateType {
        match self {
            Self::Header(header) => &header.kind,
            Self::Candidate(candidate) => &candidate.kind,
        }
    }

    pub fn as_candidate(&self) -> Option<&Candidate> {
        match self {
            Self::Candidate(candidate) => Some(candidate),
            Self::Header(_) => None,
        }
    }
}

/// Grouped, read-only list handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    entries: Vec<DisplayEntry>,
}

impl DisplayList {
    /// All rows, headers included.
    pub fn entries(&self) -> &[DisplayEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selectable rows in display order.
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().filter_map(DisplayEntry::as_candidate)
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates().count()
    }

    /// The n-th selectable row.
    pub fn candidate_at(&self, index: usize) -> Option<&Candidate> {
        self.candidates().nth(index)
    }

    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates().next()
    }

    /// Look up a selectable row by id. Header ids never match.
    pub fn find(&self, id: &str) -> Option<&Candidate> {
        self.candidates().find(|c| c.id.as_ref() == id)
    }

    /// Number of type sections.
    pub fn type_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_header()).count()
    }

    /// Candidates without their headers, in display order.
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.entries
            .into_iter()
            .filter_map(|entry| match entry {
                DisplayEntry::Candidate(candidate) => Some(candidate),
                DisplayEntry::Header(_) => None,
            })
            .collect()
    }
}

/// Group candidates by type.
///
/// Sections appear in the order their type is first seen; candidates keep
/// their original relative order within a section.
pub fn group(candidates: Vec<Candidate>) -> DisplayList {
    let mut buckets: Vec<(CandidateType, Vec<Candidate>)> = Vec::new();
    let mut index: HashMap<CandidateType, usize> = HashMap::new();

    for candidate in candidates {
        match index.get(&candidate.kind) {
            Some(&slot) => buckets[slot].1.push(candidate),
            None => {
                index.insert(candidate.kind.clone(), buckets.len());
                buckets.push((candidate.kind.clone(), vec![candidate]));
            }
        }
    }

    let mut entries = Vec::with_capacity(buckets.len() + index.len());
    for (kind, items) in buckets {
        if items.is_empty() {
            continue;
        }
        entries.push(DisplayEntry::Header(HeaderEntry::new(kind)));
        entries.extend(items.into_iter().map(DisplayEntry::Candidate));
    }

    DisplayList { entries }
}
