//! Substring search over extracted page text.
//!
//! Matching is literal and case-insensitive by construction: the query is
//! folded with the same rule as the page text, then scanned with forward
//! `find` semantics. The same scanner backs geometry mapping in
//! [`crate::locate`], which is what keeps hit offsets and segment offsets
//! in agreement.

use crate::extract::{normalize_text, PageIndex};
use crate::types::Hit;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Width of the context window on each side of a match, in characters.
const CONTEXT_CHARS: usize = 20;

/// Marker placed where a context window cut surrounding text off.
const ELLIPSIS: &str = "...";

// ---------------------------------------------------------------------------
// Occurrence scanning
// ---------------------------------------------------------------------------

/// One match of a needle within a single string.
///
/// Byte offsets slice the haystack; character offsets feed segment
/// arithmetic, where byte positions would shift under multi-byte text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub char_start: usize,
    pub char_end: usize,
    pub byte_start: usize,
    pub byte_end: usize,
}

/// Every non-overlapping occurrence of `needle` in `haystack`.
///
/// Scanning resumes one needle-length after each match, so `"aa"` in
/// `"aaa"` matches exactly once. Empty needles match nothing.
pub fn find_occurrences(haystack: &str, needle: &str) -> Vec<Occurrence> {
    let mut found = Vec::new();
    if needle.is_empty() {
        return found;
    }

    let needle_chars = needle.chars().count();
    let mut byte_pos = 0;
    let mut char_pos = 0;
    while let Some(rel) = haystack[byte_pos..].find(needle) {
        let byte_start = byte_pos + rel;
        char_pos += haystack[byte_pos..byte_start].chars().count();
        found.push(Occurrence {
            char_start: char_pos,
            char_end: char_pos + needle_chars,
            byte_start,
            byte_end: byte_start + needle.len(),
        });
        char_pos += needle_chars;
        byte_pos = byte_start + needle.len();
    }
    found
}

/// Context string for an occurrence: up to [`CONTEXT_CHARS`] characters on
/// each side of the match, with an ellipsis marker on any side where text
/// was cut off.
fn context_window(haystack: &str, occ: &Occurrence) -> String {
    let before = &haystack[..occ.byte_start];
    let after = &haystack[occ.byte_end..];

    let mut taken: Vec<char> = Vec::with_capacity(CONTEXT_CHARS);
    let mut rev = before.chars().rev();
    for c in rev.by_ref().take(CONTEXT_CHARS) {
        taken.push(c);
    }
    let clipped_front = rev.next().is_some();
    let prefix: String = taken.into_iter().rev().collect();

    let mut fwd = after.chars();
    let suffix: String = fwd.by_ref().take(CONTEXT_CHARS).collect();
    let clipped_back = fwd.next().is_some();

    let mut context = String::new();
    if clipped_front {
        context.push_str(ELLIPSIS);
    }
    context.push_str(&prefix);
    context.push_str(&haystack[occ.byte_start..occ.byte_end]);
    context.push_str(&suffix);
    if clipped_back {
        context.push_str(ELLIPSIS);
    }
    context
}

// ---------------------------------------------------------------------------
// Page and document search
// ---------------------------------------------------------------------------

/// Search one page for an already-normalized query.
pub fn search_page(page: &PageIndex, normalized_query: &str) -> Vec<Hit> {
    find_occurrences(&page.search_text, normalized_query)
        .iter()
        .enumerate()
        .map(|(i, occ)| Hit {
            page_number: page.page_number,
            char_start: occ.char_start,
            char_end: occ.char_end,
            context: context_window(&page.search_text, occ),
            occurrence_index: i,
        })
        .collect()
}

/// Search every page, in the page order given.
///
/// The query is normalized here with the same rule used when the pages
/// were extracted; a query that is empty before or after normalization
/// yields no hits.
pub fn search_pages(pages: &[PageIndex], query: &str) -> Vec<Hit> {
    let query = normalize_text(query);
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for page in pages {
        hits.extend(search_page(page, &query));
    }
    log::debug!(
        "query matched {} time(s) across {} page(s)",
        hits.len(),
        pages.len()
    );
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, search_text: &str) -> PageIndex {
        PageIndex {
            page_number: number,
            search_text: search_text.to_string(),
            display_text: String::new(),
        }
    }

    // =====================================================================
    // find_occurrences
    // =====================================================================

    #[test]
    fn test_find_does_not_overlap() {
        let occs = find_occurrences("aaa", "aa");
        assert_eq!(occs.len(), 1);
        assert_eq!(occs[0].char_start, 0);
        assert_eq!(occs[0].char_end, 2);
    }

    #[test]
    fn test_find_counts_chars_not_bytes() {
        // Three kana before the match: char offset 3, byte offset 9.
        let occs = find_occurrences("あいうabcあいう", "abc");
        assert_eq!(occs.len(), 1);
        assert_eq!(occs[0].char_start, 3);
        assert_eq!(occs[0].char_end, 6);
        assert_eq!(occs[0].byte_start, 9);
        assert_eq!(occs[0].byte_end, 12);
    }

    #[test]
    fn test_find_multiple_occurrences() {
        let occs = find_occurrences("abcXYZabc", "abc");
        assert_eq!(occs.len(), 2);
        assert_eq!(occs[0].char_start, 0);
        assert_eq!(occs[1].char_start, 6);
    }

    #[test]
    fn test_find_empty_needle() {
        assert!(find_occurrences("abc", "").is_empty());
    }

    // =====================================================================
    // context windows
    // =====================================================================

    #[test]
    fn test_context_no_ellipsis_when_string_fits() {
        let hits = search_page(&page(1, "abcXYZabc"), "abc");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].context, "abcXYZabc");
        assert_eq!(hits[1].context, "abcXYZabc");
    }

    #[test]
    fn test_context_clips_both_sides() {
        let text = format!("{}needle{}", "x".repeat(30), "y".repeat(30));
        let hits = search_page(&page(1, &text), "needle");
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].context,
            format!("...{}needle{}...", "x".repeat(20), "y".repeat(20))
        );
    }

    #[test]
    fn test_context_clips_one_side_only() {
        let text = format!("needle{}", "y".repeat(30));
        let hits = search_page(&page(1, &text), "needle");
        assert_eq!(hits[0].context, format!("needle{}...", "y".repeat(20)));

        let text = format!("{}needle", "x".repeat(30));
        let hits = search_page(&page(1, &text), "needle");
        assert_eq!(hits[0].context, format!("...{}needle", "x".repeat(20)));
    }

    #[test]
    fn test_context_exact_window_has_no_ellipsis() {
        // Exactly 20 characters on each side: clamped by availability, not
        // cut off, so no markers.
        let text = format!("{}needle{}", "x".repeat(20), "y".repeat(20));
        let hits = search_page(&page(1, &text), "needle");
        assert_eq!(hits[0].context, text);
    }

    #[test]
    fn test_context_multibyte_window() {
        let text = format!("{}本文{}", "あ".repeat(25), "ん".repeat(25));
        let hits = search_page(&page(1, &text), "本文");
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].context,
            format!("...{}本文{}...", "あ".repeat(20), "ん".repeat(20))
        );
    }

    // =====================================================================
    // search_pages
    // =====================================================================

    #[test]
    fn test_search_normalizes_query() {
        let pages = vec![page(1, "hello world")];
        // Full-width upper-case query still matches.
        let hits = search_pages(&pages, "ＨＥＬＬＯ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].char_start, 0);
    }

    #[test]
    fn test_search_empty_query_is_noop() {
        let pages = vec![page(1, "anything")];
        assert!(search_pages(&pages, "").is_empty());
    }

    #[test]
    fn test_search_occurrence_index_resets_per_page() {
        let pages = vec![page(1, "ab ab"), page(2, "ab")];
        let hits = search_pages(&pages, "ab");
        assert_eq!(hits.len(), 3);
        assert_eq!((hits[0].page_number, hits[0].occurrence_index), (1, 0));
        assert_eq!((hits[1].page_number, hits[1].occurrence_index), (1, 1));
        assert_eq!((hits[2].page_number, hits[2].occurrence_index), (2, 0));
    }

    #[test]
    fn test_search_results_follow_page_order() {
        let pages = vec![page(1, "tea"), page(2, "no match"), page(3, "tea tea")];
        let hits = search_pages(&pages, "tea");
        let page_numbers: Vec<u32> = hits.iter().map(|h| h.page_number).collect();
        assert_eq!(page_numbers, vec![1, 3, 3]);
    }
}
