//! Bounded match scanning
//!
//! All text scanning goes through [`scan`], which drives a `find_at`
//! callback with an explicit cursor. The cursor strictly advances on every
//! step (past the match, or one character past a rejected or zero-length
//! candidate), so the loop runs at most `text.len() + 1` times whatever the
//! callback returns.

use std::ops::Range;

/// Walk non-overlapping matches of `find_at` over `text`
///
/// `find_at(pos)` returns the next candidate at or after byte offset `pos`
/// (always a char boundary). With `whole_word`, candidates adjacent to an
/// alphanumeric character are skipped. `visit` receives each accepted match
/// and returns `false` to stop early. Returns the number of accepted matches.
pub(crate) fn scan<F, V>(text: &str, mut find_at: F, whole_word: bool, mut visit: V) -> usize
where
    F: FnMut(usize) -> Option<Range<usize>>,
    V: FnMut(Range<usize>) -> bool,
{
    let mut pos = 0;
    let mut accepted = 0;

    for _ in 0..=text.len() {
        if pos > text.len() {
            break;
        }
        let Some(range) = find_at(pos) else {
            break;
        };
        if range.start < pos || range.end < range.start || range.end > text.len() {
            break;
        }
        if range.is_empty() || (whole_word && !is_word_bounded(text, &range)) {
            pos = next_char_boundary(text, range.start);
            continue;
        }

        accepted += 1;
        pos = range.end;
        if !visit(range) {
            break;
        }
    }

    accepted
}

/// Finder for a literal needle, for use with [`scan`]
pub(crate) fn literal<'a>(haystack: &'a str, needle: &'a str) -> impl FnMut(usize) -> Option<Range<usize>> + 'a {
    move |pos| {
        haystack
            .get(pos..)?
            .find(needle)
            .map(|offset| pos + offset..pos + offset + needle.len())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when neither neighbour of `range` is a word character
pub(crate) fn is_word_bounded(text: &str, range: &Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Smallest char boundary strictly after `index`, or `text.len() + 1` at
/// the end of the text
fn next_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len() + 1;
    }
    let mut next = index + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(text: &str, needle: &str, whole_word: bool) -> usize {
        scan(text, literal(text, needle), whole_word, |_| true)
    }

    #[test]
    fn test_non_overlapping_count() {
        assert_eq!(count("aaaa", "aa", false), 2);
        assert_eq!(count("aaa", "aa", false), 1);
        assert_eq!(count("abcabc", "abc", false), 2);
        assert_eq!(count("abc", "x", false), 0);
    }

    #[test]
    fn test_zero_length_finder_terminates() {
        let text = "héllo";
        let mut calls = 0;
        let accepted = scan(
            text,
            |pos| {
                calls += 1;
                Some(pos..pos)
            },
            false,
            |_| true,
        );
        assert_eq!(accepted, 0);
        // one call per char boundary plus the end position
        assert_eq!(calls, 6);
    }

    #[test]
    fn test_misbehaving_finder_is_cut_off() {
        let accepted = scan("abc", |_| Some(0..1), false, |_| true);
        assert_eq!(accepted, 1);
    }

    #[test]
    fn test_whole_word_boundaries() {
        assert_eq!(count("cat concat cat_s cat.", "cat", true), 2);
        assert_eq!(count("toys", "toy", true), 0);
        assert_eq!(count("ab ab", "ab", true), 2);
    }

    #[test]
    fn test_whole_word_retries_inside_rejected_candidate() {
        // "aa" at 0 is glued to the next "a"; the scan must still reach the
        // standalone "aa" at the end
        assert_eq!(count("aaa aa", "aa", true), 1);
    }

    #[test]
    fn test_visit_can_stop_early() {
        let mut seen = Vec::new();
        let text = "x.x.x.x";
        scan(text, literal(text, "x"), false, |range| {
            seen.push(range.start);
            seen.len() < 2
        });
        assert_eq!(seen, vec![0, 2]);
    }
}
