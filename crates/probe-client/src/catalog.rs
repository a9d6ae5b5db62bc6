//! Offline demo catalog.
//!
//! A fixed set of chain and content records that stands in for the search
//! service when no console is reachable. Matching is a case-insensitive
//! substring test on the title.

use probe_core::Candidate;

/// In-memory stand-in for the search service.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Candidate>,
}

impl Catalog {
    pub fn new(records: Vec<Candidate>) -> Self {
        Self { records }
    }

    /// Blocks, accounts, transactions and media records for demos.
    pub fn demo() -> Self {
        const ADDR_A: &str = "0x1234567890123456789012345678901234567890";
        const ADDR_B: &str = "0xabcdef1234567890abcdef1234567890abcdef12";
        const TX_A: &str = "0xabcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890";
        const TX_B: &str = "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";

        Self::new(vec![
            Candidate::new("12345", "Block #12345", "block").with_subtitle("Added 2 hours ago"),
            Candidate::new("12344", "Block #12344", "block").with_subtitle("Added 3 hours ago"),
            Candidate::new(ADDR_A, ADDR_A, "account").with_subtitle("Last active 5 min ago"),
            Candidate::new(ADDR_B, ADDR_B, "account").with_subtitle("Last active 10 min ago"),
            Candidate::new(TX_A, TX_A, "transaction").with_subtitle("Confirmed 10 min ago"),
            Candidate::new(TX_B, TX_B, "transaction").with_subtitle("Confirmed 15 min ago"),
            Candidate::new("7", "Summer Vibes", "track").with_subtitle("Track by Artist123"),
            Candidate::new("8", "Winter Dreams", "track").with_subtitle("Track by Artist456"),
            Candidate::new("9", "Artist123", "username").with_subtitle("Verified Artist"),
            Candidate::new("10", "Artist456", "username").with_subtitle("Verified Artist"),
            Candidate::new("11", "Playlist: Summer Hits", "playlist").with_subtitle("By Artist123"),
            Candidate::new("12", "Album: Winter Collection", "album").with_subtitle("By Artist456"),
        ])
    }

    /// Records whose title contains the query. Blank queries match nothing.
    pub fn search(&self, query: &str) -> Vec<Candidate> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|c| c.title_matches(query))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
