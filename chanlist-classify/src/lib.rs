//! chanlist-classify - content classification engine
//!
//! Scans the text fields of a channel [`Document`] for configured phrases,
//! whole words, or flagged characters and renders a [`Verdict`] against a
//! threshold. Every check is the same algorithm parametrized by a
//! [`Strategy`]:
//!
//! 1. Normalize the key list (trim, drop empties, de-duplicate)
//! 2. Extract named fields from the document
//! 3. Scan each field, tallying hits and collecting evidence excerpts
//! 4. Aggregate per document or per field and apply the threshold
//! 5. Sort evidence by descending hit count (stable)
//!
//! The engine is total: it never fails and never logs.

pub mod document;
pub mod engine;
pub mod fields;
mod fold;
pub mod keys;
mod sample;
mod scan;
pub mod screen;
pub mod threshold;
pub mod verdict;

pub use document::{ChannelInfo, Document, Video};
pub use engine::{
    classify, classify_chars, classify_words, Aggregation, Classifier, Matching, ScanOptions,
    Strategy, Tally,
};
pub use fields::{extract_fields, Field};
pub use screen::{CheckOutcome, Screen, ScreenReport};
pub use threshold::Threshold;
pub use verdict::{FieldHits, FieldTally, MatchRecord, Verdict};
