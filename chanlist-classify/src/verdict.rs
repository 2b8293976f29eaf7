//! Verdict and evidence types returned by the engine

use serde::{Deserialize, Serialize};

/// Pass/fail decision plus the evidence behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// True when the document is admitted
    pub ok: bool,
    /// Coerced threshold the decision was made against
    pub threshold: u32,
    /// Keys that matched at least once anywhere in the document
    pub distinct_hit_count: usize,
    /// Sum of every per-key, per-field count
    pub total_hit_count: usize,
    /// One record per matched key, by descending hits (ties in key order)
    pub matches: Vec<MatchRecord>,
    /// Per-field distinct key counts, in field order, for fields with hits
    pub fields: Vec<FieldTally>,
}

impl Verdict {
    /// Records for keys that hit inside the named field
    pub fn matches_in<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        self.matches
            .iter()
            .filter(move |record| record.per_field.iter().any(|hits| hits.field == field))
    }

    /// Fields whose distinct count exceeded a per-field limit
    pub fn failing_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|tally| tally.exceeded)
            .map(|tally| tally.field.as_str())
    }
}

/// Every hit of one key across the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// The phrase, word or character as configured (trimmed)
    pub key: String,
    /// Sum of `per_field` counts; always at least 1
    pub hits_total_in_document: usize,
    /// Fields containing the key, in field order
    pub per_field: Vec<FieldHits>,
}

/// Hits of one key inside one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHits {
    /// Field name
    pub field: String,
    /// Occurrences (or 1 under presence tallying)
    pub count: usize,
    /// Context excerpts from the original text
    pub samples: Vec<String>,
}

/// Distinct keys found in one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTally {
    /// Field name
    pub field: String,
    /// Distinct keys present in the field
    pub distinct: usize,
    /// True when a per-field limit was exceeded
    pub exceeded: bool,
}
