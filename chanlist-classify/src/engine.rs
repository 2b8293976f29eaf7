//! Classification engine
//!
//! One algorithm, three strategy axes:
//!
//! | axis          | values                                   |
//! |---------------|------------------------------------------|
//! | `Matching`    | substring, whole word, character set     |
//! | `Tally`       | occurrence count, distinct presence      |
//! | `Aggregation` | per document, per field                  |
//!
//! # Decision rules
//! - Per document: `ok` when strictly fewer than `threshold` distinct keys
//!   matched. Reaching the threshold rejects.
//! - Per field: `ok` unless some field holds more than `threshold` distinct
//!   keys. Reaching the limit still passes.
//!
//! The two rules point in opposite directions at the boundary and are kept
//! that way; configured thresholds depend on it.
//!
//! # Example
//! ```rust
//! use chanlist_classify::{classify, Document, ScanOptions};
//!
//! let doc = Document::new("Tiny Tunes", "Nursery rhymes for toddlers", ["ABC song"]);
//! let verdict = classify(&doc, ["nursery rhymes", "toddlers", "lullaby"], 2, &ScanOptions::default());
//!
//! assert!(!verdict.ok);
//! assert_eq!(verdict.distinct_hit_count, 2);
//! ```

use crate::document::Document;
use crate::fields::{extract_fields, Field};
use crate::fold::Folded;
use crate::keys::{normalize_chars, normalize_phrases, Key};
use crate::sample::excerpt;
use crate::scan::{literal, scan};
use crate::threshold::Threshold;
use crate::verdict::{FieldHits, FieldTally, MatchRecord, Verdict};
use chanlist_common::config::ClassifierSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How keys are located in a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matching {
    /// Case-insensitive substring
    Substring,
    /// Case-insensitive, not adjacent to a letter, digit or underscore
    WholeWord,
    /// Exact single characters
    CharSet,
}

/// What a key contributes per field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tally {
    /// Every non-overlapping occurrence counts
    Occurrences,
    /// A key present in a field counts once
    Presence,
}

/// Where the threshold is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Distinct keys across the whole document; reject at `>= threshold`
    PerDocument,
    /// Distinct keys within each field; reject any field `> threshold`
    PerField,
}

/// Full parametrization of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub matching: Matching,
    pub tally: Tally,
    pub aggregation: Aggregation,
}

impl Strategy {
    /// Phrase lists (taxonomies)
    pub const fn phrase() -> Self {
        Self {
            matching: Matching::Substring,
            tally: Tally::Occurrences,
            aggregation: Aggregation::PerDocument,
        }
    }

    /// Word lists
    pub const fn word() -> Self {
        Self {
            matching: Matching::WholeWord,
            tally: Tally::Occurrences,
            aggregation: Aggregation::PerDocument,
        }
    }

    /// Flagged characters outside an allowed alphabet
    pub const fn char_set() -> Self {
        Self {
            matching: Matching::CharSet,
            tally: Tally::Presence,
            aggregation: Aggregation::PerField,
        }
    }
}

/// Evidence collection limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Excerpts kept per field per key
    pub max_samples_per_field: usize,
    /// Characters of context on each side of a match
    pub sample_window: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_samples_per_field: 3,
            sample_window: 40,
        }
    }
}

impl From<&ClassifierSettings> for ScanOptions {
    fn from(settings: &ClassifierSettings) -> Self {
        Self {
            max_samples_per_field: settings.max_samples_per_field,
            sample_window: settings.sample_window,
        }
    }
}

#[derive(Debug, Clone)]
enum Keys {
    Text(Vec<Key>),
    Chars {
        chars: Vec<char>,
        index: HashMap<char, usize>,
    },
}

impl Keys {
    fn len(&self) -> usize {
        match self {
            Keys::Text(keys) => keys.len(),
            Keys::Chars { chars, .. } => chars.len(),
        }
    }

    fn label(&self, k: usize) -> String {
        match self {
            Keys::Text(keys) => keys[k].text.clone(),
            Keys::Chars { chars, .. } => chars[k].to_string(),
        }
    }
}

/// Per-key accumulator for one classification run
#[derive(Default)]
struct KeyHits {
    total: usize,
    per_field: Vec<FieldHits>,
}

/// A prepared check
///
/// Keys are normalized and folded once; `classify` can then run against
/// any number of documents. Immutable and `Sync`.
#[derive(Debug, Clone)]
pub struct Classifier {
    keys: Keys,
    strategy: Strategy,
    threshold: Threshold,
    options: ScanOptions,
}

impl Classifier {
    /// Prepare a check from a raw key list
    pub fn new<I, S>(
        raw_keys: I,
        strategy: Strategy,
        threshold: impl Into<Threshold>,
        options: ScanOptions,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = match strategy.matching {
            Matching::CharSet => {
                let chars = normalize_chars(raw_keys);
                let index = chars.iter().enumerate().map(|(k, &c)| (c, k)).collect();
                Keys::Chars { chars, index }
            }
            Matching::Substring | Matching::WholeWord => Keys::Text(normalize_phrases(raw_keys)),
        };

        Self {
            keys,
            strategy,
            threshold: threshold.into(),
            options,
        }
    }

    /// Strategy this check runs with
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Coerced threshold
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Number of usable keys after normalization
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Classify a document
    pub fn classify(&self, document: &Document) -> Verdict {
        self.classify_fields(&extract_fields(document))
    }

    /// Classify already extracted fields
    pub fn classify_fields(&self, fields: &[Field]) -> Verdict {
        let mut hits: Vec<KeyHits> = (0..self.keys.len()).map(|_| KeyHits::default()).collect();
        let mut field_distinct = vec![0usize; fields.len()];

        // Nothing to look for: skip the scan, the decision rule still applies
        if !hits.is_empty() {
            for (f, field) in fields.iter().enumerate() {
                field_distinct[f] = match &self.keys {
                    Keys::Text(keys) => self.scan_text_field(keys, field, &mut hits),
                    Keys::Chars { index, .. } => self.scan_char_field(index, field, &mut hits),
                };
            }
        }

        self.aggregate(fields, hits, field_distinct)
    }

    /// Scan one field for phrase or word keys; returns distinct keys found
    ///
    /// Every match is found in the folded text and counted; the first
    /// `max_samples_per_field` of them are excerpted from the original text,
    /// so a counted key always has evidence (unless samples are disabled).
    fn scan_text_field(&self, keys: &[Key], field: &Field, hits: &mut [KeyHits]) -> usize {
        if field.text.is_empty() {
            return 0;
        }
        let whole_word = self.strategy.matching == Matching::WholeWord;
        let limit = self.options.max_samples_per_field;
        let folded = Folded::new(&field.text);
        let mut distinct = 0;

        for (k, key) in keys.iter().enumerate() {
            let needle = key.folded.as_str();
            if !folded.text.contains(needle) {
                continue;
            }
            let mut samples = Vec::new();
            let count = scan(&folded.text, literal(&folded.text, needle), whole_word, |range| {
                if samples.len() < limit {
                    let original = folded.original_range(range);
                    samples.push(excerpt(&field.text, original, self.options.sample_window));
                }
                true
            });
            if count == 0 {
                continue;
            }

            self.record(&mut hits[k], field, count, samples);
            distinct += 1;
        }

        distinct
    }

    /// Scan one field for flagged characters; returns distinct chars found
    fn scan_char_field(
        &self,
        index: &HashMap<char, usize>,
        field: &Field,
        hits: &mut [KeyHits],
    ) -> usize {
        let limit = self.options.max_samples_per_field;
        let mut counts = vec![0usize; hits.len()];
        let mut samples: Vec<Vec<String>> = vec![Vec::new(); hits.len()];

        for (i, c) in field.text.char_indices() {
            if let Some(&k) = index.get(&c) {
                counts[k] += 1;
                if samples[k].len() < limit {
                    samples[k].push(excerpt(
                        &field.text,
                        i..i + c.len_utf8(),
                        self.options.sample_window,
                    ));
                }
            }
        }

        let mut distinct = 0;
        for (k, (count, samples)) in counts.into_iter().zip(samples).enumerate() {
            if count > 0 {
                self.record(&mut hits[k], field, count, samples);
                distinct += 1;
            }
        }
        distinct
    }

    fn record(&self, key_hits: &mut KeyHits, field: &Field, occurrences: usize, samples: Vec<String>) {
        let count = match self.strategy.tally {
            Tally::Occurrences => occurrences,
            Tally::Presence => 1,
        };
        key_hits.total += count;
        key_hits.per_field.push(FieldHits {
            field: field.name.clone(),
            count,
            samples,
        });
    }

    fn aggregate(&self, fields: &[Field], hits: Vec<KeyHits>, field_distinct: Vec<usize>) -> Verdict {
        let limit = self.threshold.as_usize();
        let per_field = self.strategy.aggregation == Aggregation::PerField;

        let field_tallies: Vec<FieldTally> = fields
            .iter()
            .zip(field_distinct)
            .filter(|(_, distinct)| *distinct > 0)
            .map(|(field, distinct)| FieldTally {
                field: field.name.clone(),
                distinct,
                exceeded: per_field && distinct > limit,
            })
            .collect();

        let total_hit_count: usize = hits.iter().map(|h| h.total).sum();
        let mut matches: Vec<MatchRecord> = hits
            .into_iter()
            .enumerate()
            .filter(|(_, h)| h.total > 0)
            .map(|(k, h)| MatchRecord {
                key: self.keys.label(k),
                hits_total_in_document: h.total,
                per_field: h.per_field,
            })
            .collect();
        // stable: ties keep key order
        matches.sort_by(|a, b| b.hits_total_in_document.cmp(&a.hits_total_in_document));

        let distinct_hit_count = matches.len();
        let ok = match self.strategy.aggregation {
            Aggregation::PerDocument => distinct_hit_count < limit,
            Aggregation::PerField => !field_tallies.iter().any(|tally| tally.exceeded),
        };

        Verdict {
            ok,
            threshold: self.threshold.get(),
            distinct_hit_count,
            total_hit_count,
            matches,
            fields: field_tallies,
        }
    }
}

/// Phrase check: case-insensitive substrings, rejected when at least
/// `threshold` distinct phrases match anywhere in the document
pub fn classify<I, S>(
    document: &Document,
    phrases: I,
    threshold: impl Into<Threshold>,
    options: &ScanOptions,
) -> Verdict
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Classifier::new(phrases, Strategy::phrase(), threshold, options.clone()).classify(document)
}

/// Word check: like [`classify`] but keys must match whole words
pub fn classify_words<I, S>(
    document: &Document,
    words: I,
    threshold: impl Into<Threshold>,
    options: &ScanOptions,
) -> Verdict
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Classifier::new(words, Strategy::word(), threshold, options.clone()).classify(document)
}

/// Character-set check: rejected when any single field contains more than
/// `max_distinct_per_field` distinct flagged characters
pub fn classify_chars<I, S>(
    document: &Document,
    flagged: I,
    max_distinct_per_field: impl Into<Threshold>,
    options: &ScanOptions,
) -> Verdict
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Classifier::new(flagged, Strategy::char_set(), max_distinct_per_field, options.clone())
        .classify(document)
}
