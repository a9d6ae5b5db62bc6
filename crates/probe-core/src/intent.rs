//! Query classification.
//!
//! Maps the lexical shape of a query to the kind of record the user is most
//! likely looking for. Rules are evaluated in order and the first match wins:
//!
//! 1. empty or whitespace only: `Unset`
//! 2. `0x` prefix: full address, full hash, or a length-based guess
//! 3. all digits: `Block`
//! 4. word characters, dashes and spaces: `Content`
//! 5. anything else: rejected
//!
//! The `0x` rule comes before the others because addresses and hashes are
//! alphanumeric and would otherwise be classified as content.

// Static patterns below are known to compile.
#![allow(clippy::expect_used)]

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static FULL_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("valid address pattern"));

static FULL_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[a-fA-F0-9]{64}$").expect("valid hash pattern"));

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid digits pattern"));

static CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\- ]+$").expect("valid content pattern"));

/// `0x` + 40 hex digits, in UTF-16 code units as the browser measures it.
const ADDRESS_LEN: usize = 42;

/// Inferred category of a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentLabel {
    #[default]
    Unset,
    Account,
    Transaction,
    Block,
    /// Results span several types and are shown unfiltered.
    All,
    Content,
}

impl IntentLabel {
    /// Label shown next to the search box. Empty for `Unset`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Account => "Account",
            Self::Transaction => "Transaction",
            Self::Block => "Block",
            Self::All => "All",
            Self::Content => "Content",
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a query.
///
/// Keeps "nothing typed yet" apart from "typed something no rule accepts":
/// both carry the `Unset` label, but only the latter is a hard reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Intent(IntentLabel),
    Reject,
}

impl Classification {
    pub fn label(&self) -> IntentLabel {
        match self {
            Self::Intent(label) => *label,
            Self::Reject => IntentLabel::Unset,
        }
    }

    pub fn is_reject(&self) -> bool {
        matches!(self, Self::Reject)
    }
}

/// Classify a query by its lexical shape.
pub fn classify_query(query: &str) -> Classification {
    if query.trim().is_empty() {
        return Classification::Intent(IntentLabel::Unset);
    }

    if query.starts_with("0x") {
        let label = if FULL_ADDRESS.is_match(query) {
            IntentLabel::Account
        } else if FULL_HASH.is_match(query) {
            IntentLabel::Transaction
        } else if query.encode_utf16().count() <= ADDRESS_LEN {
            IntentLabel::Account
        } else {
            IntentLabel::Transaction
        };
        return Classification::Intent(label);
    }

    if DIGITS.is_match(query) {
        return Classification::Intent(IntentLabel::Block);
    }

    if CONTENT.is_match(query) {
        return Classification::Intent(IntentLabel::Content);
    }

    Classification::Reject
}

/// Intent label for a query. Rejected queries report `Unset`.
pub fn classify(query: &str) -> IntentLabel {
    classify_query(query).label()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x1234567890123456789012345678901234567890";
    const HASH: &str = "0xabcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890";

    #[test]
    fn test_empty_is_unset_not_reject() {
        assert_eq!(classify_query(""), Classification::Intent(IntentLabel::Unset));
        assert_eq!(classify_query("   "), Classification::Intent(IntentLabel::Unset));
    }

    #[test]
    fn test_full_address_and_hash() {
        assert_eq!(classify(ADDRESS), IntentLabel::Account);
        assert_eq!(classify(HASH), IntentLabel::Transaction);
    }

    #[test]
    fn test_hex_case_does_not_matter() {
        assert_eq!(classify(&ADDRESS.replace('1', "A")), IntentLabel::Account);
        assert_eq!(classify(&HASH.to_uppercase().replacen("0X", "0x", 1)), IntentLabel::Transaction);
        assert_eq!(
            classify("0xABCDEF1234567890abcdef1234567890ABCDEF12"),
            IntentLabel::Account
        );
    }

    #[test]
    fn test_partial_hex_uses_length() {
        assert_eq!(classify("0x"), IntentLabel::Account);
        assert_eq!(classify("0x12"), IntentLabel::Account);
        // 43 characters, too long for an address
        let long = format!("{}a", ADDRESS);
        assert_eq!(classify(&long), IntentLabel::Transaction);
        // Non-hex tail still falls into the prefix branch
        assert_eq!(classify("0xzz"), IntentLabel::Account);
    }

    #[test]
    fn test_partial_hex_length_counts_utf16_units() {
        // 42 chars but 43 UTF-16 units: the emoji is a surrogate pair
        let query = format!("0x{}\u{1F600}", "a".repeat(39));
        assert_eq!(query.chars().count(), 42);
        assert_eq!(classify(&query), IntentLabel::Transaction);

        // 42 chars, 42 units
        let query = format!("0x{}\u{e9}", "a".repeat(39));
        assert_eq!(classify(&query), IntentLabel::Account);
    }

    #[test]
    fn test_digits_are_blocks() {
        assert_eq!(classify("12345"), IntentLabel::Block);
        assert_eq!(classify("0"), IntentLabel::Block);
    }

    #[test]
    fn test_content() {
        assert_eq!(classify("Summer Vibes"), IntentLabel::Content);
        assert_eq!(classify("artist_123-x"), IntentLabel::Content);
        assert_eq!(classify("12 34"), IntentLabel::Content);
    }

    #[test]
    fn test_reject() {
        assert_eq!(classify_query("###"), Classification::Reject);
        assert_eq!(classify("###"), IntentLabel::Unset);
        assert!(classify_query("what?").is_reject());
        assert!(classify_query("café").is_reject());
    }
}
