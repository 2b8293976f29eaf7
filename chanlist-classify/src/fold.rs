//! Case folding for phrase and word matching
//!
//! Keys and field text are folded with the same per-character mapping
//! (`char::to_lowercase`, with final sigma `ς` folded onto `σ`). Folding can
//! change byte lengths (`İ` becomes `i̇`), so a folded field keeps a span
//! table that maps folded offsets back to the original text. Counting and
//! evidence both come from matches in the folded text.

use std::ops::Range;

/// Fold a single character
fn fold_char(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().map(|l| if l == 'ς' { 'σ' } else { l })
}

/// Fold a key
pub(crate) fn fold(text: &str) -> String {
    text.chars().flat_map(fold_char).collect()
}

/// A folded field with offsets back into the original
#[derive(Debug)]
pub(crate) struct Folded {
    pub text: String,
    /// (folded start, original start, original end) per original char
    spans: Vec<(usize, usize, usize)>,
}

impl Folded {
    pub fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut spans = Vec::with_capacity(original.len());
        for (i, c) in original.char_indices() {
            spans.push((text.len(), i, i + c.len_utf8()));
            text.extend(fold_char(c));
        }
        Self { text, spans }
    }

    /// Original byte range covering the folded range
    ///
    /// A range that starts or ends inside the expansion of one original
    /// character widens to that whole character.
    pub fn original_range(&self, range: Range<usize>) -> Range<usize> {
        let span_at = |offset: usize| {
            let idx = self.spans.partition_point(|&(start, _, _)| start <= offset);
            self.spans[idx.saturating_sub(1)]
        };
        if self.spans.is_empty() {
            return 0..0;
        }
        let (_, start, _) = span_at(range.start);
        if range.is_empty() {
            return start..start;
        }
        let (_, _, end) = span_at(range.end - 1);
        start..end
    }
}
