//! Key list normalization
//!
//! Raw lists come straight from configuration. Entries are trimmed, empty
//! entries are dropped, and duplicates collapse onto their first occurrence
//! so key order (and therefore tie order in verdicts) follows the input.

use crate::fold::fold;
use std::collections::HashSet;

/// A phrase or word key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Trimmed key as written; reported in match records
    pub text: String,
    /// Case-folded key used for matching
    pub folded: String,
}

/// Normalize phrase or word keys
///
/// Matching is case-insensitive, so keys differing only by case are
/// duplicates.
pub fn normalize_phrases<I, S>(raw: I) -> Vec<Key>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|entry| {
            let text = entry.as_ref().trim();
            if text.is_empty() {
                return None;
            }
            let folded = fold(text);
            seen.insert(folded.clone()).then(|| Key {
                text: text.to_string(),
                folded,
            })
        })
        .collect()
}

/// Normalize a flagged character list
///
/// Every non-whitespace character of every entry is flagged, so both
/// `["ж", "щ"]` and `["жщ"]` flag two characters. Character matching is
/// exact (no case folding).
pub fn normalize_chars<I, S>(raw: I) -> Vec<char>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut chars = Vec::new();
    for entry in raw {
        for c in entry.as_ref().chars().filter(|c| !c.is_whitespace()) {
            if seen.insert(c) {
                chars.push(c);
            }
        }
    }
    chars
}
