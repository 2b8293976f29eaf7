//! Evidence excerpts

use std::ops::Range;

const ELLIPSIS: char = '…';

/// Excerpt of `text` around `range` with up to `window` characters of
/// context on each side.
///
/// Runs of whitespace collapse to a single space so multi-line descriptions
/// stay on one line. An ellipsis marks each clipped end.
pub(crate) fn excerpt(text: &str, range: Range<usize>, window: usize) -> String {
    let before = &text[..range.start];
    let after = &text[range.end..];

    let start = if window == 0 {
        range.start
    } else {
        before
            .char_indices()
            .rev()
            .nth(window - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let end = after
        .char_indices()
        .nth(window)
        .map(|(i, _)| range.end + i)
        .unwrap_or(text.len());

    let mut out = String::with_capacity(end - start + 2 * ELLIPSIS.len_utf8());
    if start > 0 {
        out.push(ELLIPSIS);
    }
    push_collapsed(&mut out, &text[start..end]);
    if end < text.len() {
        out.push(ELLIPSIS);
    }
    out
}

fn push_collapsed(out: &mut String, text: &str) {
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_not_clipped() {
        let text = "I love kids";
        assert_eq!(excerpt(text, 7..11, 40), "I love kids");
    }

    #[test]
    fn test_clipped_both_sides() {
        let text = "0123456789MATCH9876543210";
        assert_eq!(excerpt(text, 10..15, 3), "…789MATCH987…");
    }

    #[test]
    fn test_zero_window() {
        let text = "abc MATCH def";
        assert_eq!(excerpt(text, 4..9, 0), "…MATCH…");
    }

    #[test]
    fn test_multibyte_context() {
        let text = "ёжик в тумане";
        // match "в" (bytes 9..11)
        assert_eq!(excerpt(text, 9..11, 2), "…к в т…");
    }

    #[test]
    fn test_whitespace_collapsed() {
        let text = "line one\n\n  kids\tline";
        assert_eq!(excerpt(text, 12..16, 40), "line one kids line");
    }
}
