use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;

const ELLIPSIS: &str = "…";

/// Cut `input` to at most `width` graphemes, marking the cut with an ellipsis.
pub(in crate::tui) fn fit_width(input: &str, width: usize) -> Cow<'_, str> {
    let graphemes: Vec<&str> = input.graphemes(true).collect();
    if graphemes.len() <= width {
        return Cow::Borrowed(input);
    }
    if width == 0 {
        return Cow::Owned(String::new());
    }
    let mut cut = graphemes[..width - 1].concat();
    cut.push_str(ELLIPSIS);
    Cow::Owned(cut)
}

/// Last `width` graphemes of `input`, so the cursor end of a long input stays visible.
pub(in crate::tui) fn tail_width(input: &str, width: usize) -> &str {
    let count = input.graphemes(true).count();
    if count <= width {
        return input;
    }
    let skip = count - width;
    input
        .grapheme_indices(true)
        .nth(skip)
        .map_or("", |(offset, _)| &input[offset..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_width_borrows_short_text() {
        assert!(matches!(fit_width("milk", 10), Cow::Borrowed("milk")));
        assert_eq!(fit_width("milk", 4), "milk");
    }

    #[test]
    fn fit_width_cuts_with_ellipsis() {
        assert_eq!(fit_width("Buy milk today", 8), "Buy mil…");
        assert_eq!(fit_width("abc", 1), "…");
        assert_eq!(fit_width("abc", 0), "");
    }

    #[test]
    fn fit_width_keeps_grapheme_clusters_whole() {
        let family = "👨‍👩‍👧 picnic";
        assert_eq!(fit_width(family, 2), "👨‍👩‍👧…");
        assert_eq!(fit_width("日本語のタスク", 3), "日本…");
    }

    #[test]
    fn tail_width_shows_end_of_input() {
        assert_eq!(tail_width("short", 10), "short");
        assert_eq!(tail_width("abcdef", 3), "def");
        assert_eq!(tail_width("e\u{301}xyz", 3), "xyz");
        assert_eq!(tail_width("abc", 0), "");
    }
}
