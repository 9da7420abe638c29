//! Mapping a search occurrence back to page geometry.
//!
//! Search runs over each page's flattened text; geometry lives on the
//! segments that produced it. This module rebuilds the segment sequence
//! through the same pipeline, finds the same occurrences the search side
//! found, and unions the bounding boxes of the segments each occurrence
//! touches.

use crate::extract::{normalize_text, segment_page, Segment};
use crate::search::find_occurrences;
use crate::types::{PageStructure, Rect};

/// Union rectangles for every occurrence of an already-normalized query in
/// the page's body text, in match order.
pub fn occurrence_rects(page: &PageStructure, normalized_query: &str) -> Vec<Rect> {
    let segments = segment_page(page);
    if segments.is_empty() {
        return Vec::new();
    }

    let full_text: String = segments.iter().map(|s| s.text.as_str()).collect();
    find_occurrences(&full_text, normalized_query)
        .iter()
        .filter_map(|occ| union_over(&segments, occ.char_start, occ.char_end))
        .collect()
}

/// Rectangle for one occurrence of `query` on the page.
///
/// The query is normalized with the extraction rule first. When
/// `occurrence_index` is beyond the occurrences actually present, the
/// first occurrence's rectangle stands in; `None` only when the query does
/// not occur in the body text at all (for instance because it was filtered
/// out as ruby).
pub fn locate_occurrence(
    page: &PageStructure,
    query: &str,
    occurrence_index: usize,
) -> Option<Rect> {
    let query = normalize_text(query);
    if query.is_empty() {
        return None;
    }

    let rects = occurrence_rects(page, &query);
    let rect = rects.get(occurrence_index).or_else(|| rects.first()).copied();
    if rect.is_none() {
        log::debug!(
            "page {}: no body-text geometry for query ({} chars)",
            page.number,
            query.chars().count()
        );
    }
    rect
}

/// Union of every segment overlapping `[start, end)`.
///
/// The overlap test is strict, so a segment that merely touches the match
/// boundary contributes nothing. The union starts from a copy of the first
/// overlapping segment's rectangle; source geometry is never mutated.
fn union_over(segments: &[Segment], start: usize, end: usize) -> Option<Rect> {
    let mut union: Option<Rect> = None;
    for segment in segments {
        if segment.char_start.max(start) < segment.char_end().min(end) {
            union = Some(match union {
                None => segment.bbox,
                Some(u) => u.union(&segment.bbox),
            });
        }
    }
    union
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::index_page;
    use crate::search::search_page;
    use crate::types::{TextBlock, TextLine, TextSpan};

    fn make_span(text: &str, font_size: f32, bbox: Rect) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            font_size,
            bbox,
        }
    }

    /// Page with all spans on one line.
    fn one_line_page(spans: Vec<TextSpan>) -> PageStructure {
        let bbox = spans
            .iter()
            .map(|s| s.bbox)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
        PageStructure {
            number: 1,
            bounds: Rect::new(0.0, 0.0, 595.0, 842.0),
            blocks: vec![TextBlock {
                bbox,
                lines: vec![TextLine { bbox, spans }],
            }],
        }
    }

    #[test]
    fn test_single_segment_match_returns_its_bbox() {
        let r1 = Rect::new(50.0, 50.0, 150.0, 70.0);
        let page = one_line_page(vec![make_span("春はあけぼの", 10.0, r1)]);
        let rect = locate_occurrence(&page, "あけぼの", 0).unwrap();
        assert_eq!(rect, r1);
    }

    #[test]
    fn test_match_across_segments_unions_both() {
        let r1 = Rect::new(50.0, 50.0, 150.0, 70.0);
        let r2 = Rect::new(150.0, 50.0, 250.0, 75.0);
        let page = one_line_page(vec![
            make_span("やまぎは", 10.0, r1),
            make_span("すこし", 10.0, r2),
        ]);
        let rect = locate_occurrence(&page, "ぎはすこ", 0).unwrap();
        assert_eq!(rect, r1.union(&r2));
    }

    #[test]
    fn test_touching_segment_is_not_pulled_in() {
        let r1 = Rect::new(50.0, 50.0, 150.0, 70.0);
        let r2 = Rect::new(150.0, 50.0, 250.0, 75.0);
        let page = one_line_page(vec![
            make_span("abcd", 10.0, r1),
            make_span("efgh", 10.0, r2),
        ]);
        // Match ends exactly where the second segment begins.
        let rect = locate_occurrence(&page, "abcd", 0).unwrap();
        assert_eq!(rect, r1);
        // And one that starts exactly where the first ends.
        let rect = locate_occurrence(&page, "efgh", 0).unwrap();
        assert_eq!(rect, r2);
    }

    #[test]
    fn test_ruby_query_has_no_geometry() {
        let page = one_line_page(vec![
            make_span("本文", 10.0, Rect::new(50.0, 50.0, 90.0, 70.0)),
            make_span("ほんぶん", 5.0, Rect::new(50.0, 40.0, 90.0, 48.0)),
        ]);
        assert!(locate_occurrence(&page, "ほんぶん", 0).is_none());
    }

    #[test]
    fn test_out_of_range_occurrence_falls_back_to_first() {
        let r1 = Rect::new(10.0, 10.0, 20.0, 20.0);
        let r2 = Rect::new(100.0, 100.0, 120.0, 120.0);
        let page = one_line_page(vec![
            make_span("ab", 10.0, r1),
            make_span("xx", 10.0, Rect::new(40.0, 10.0, 60.0, 20.0)),
            make_span("ab", 10.0, r2),
        ]);
        assert_eq!(locate_occurrence(&page, "ab", 1).unwrap(), r2);
        assert_eq!(locate_occurrence(&page, "ab", 9).unwrap(), r1);
    }

    #[test]
    fn test_empty_query_locates_nothing() {
        let page = one_line_page(vec![make_span("text", 10.0, Rect::new(0.0, 0.0, 10.0, 10.0))]);
        assert!(locate_occurrence(&page, "", 0).is_none());
    }

    #[test]
    fn test_locate_agrees_with_search() {
        let page = one_line_page(vec![
            make_span("いろはにほへと", 10.0, Rect::new(0.0, 0.0, 70.0, 10.0)),
            make_span("ちりぬるを", 10.0, Rect::new(70.0, 0.0, 120.0, 10.0)),
            make_span("いろは", 10.0, Rect::new(120.0, 0.0, 150.0, 10.0)),
        ]);
        let index = index_page(&page);
        for query in ["いろは", "と", "ちりぬるを", "ほへとちり"] {
            let normalized = normalize_text(query);
            let hits = search_page(&index, &normalized);
            let rects = occurrence_rects(&page, &normalized);
            assert_eq!(
                hits.len(),
                rects.len(),
                "search and locate disagree for {query:?}"
            );
        }
    }
}
