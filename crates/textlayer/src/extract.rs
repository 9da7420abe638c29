//! Body-text extraction: font-size statistics, normalization, and the
//! segment pipeline shared by search and geometry mapping.
//!
//! Pages mix body text with smaller annotation text (ruby glosses,
//! footnotes). The pipeline below decides which spans survive, folds their
//! text into a search-stable form, and flattens them into one string per
//! page while remembering where each span landed in it.
//!
//! # Pipeline
//!
//! ```text
//! PageStructure  ->  threshold           ->  Segment[]     ->  PageIndex
//!   (per page)       body_size_threshold     segment_page      index_page
//! ```
//!
//! Search consumes the flattened string; geometry mapping consumes the
//! segments. Both sides go through [`segment_page`] so their character
//! offsets can never drift apart.

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::types::{PageStructure, Rect, TextSpan};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One retained span after filtering and normalization, with its place in
/// the page's flattened search text.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Normalized span text.
    pub text: String,
    /// Bounding box copied from the source span.
    pub bbox: Rect,
    /// Character offset of `text` within the page's `search_text`.
    pub char_start: usize,
}

impl Segment {
    /// Character length of the segment text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// One past the last character offset covered by this segment.
    pub fn char_end(&self) -> usize {
        self.char_start + self.char_len()
    }
}

/// One page's extracted text, built once at document load and immutable
/// until the next load.
#[derive(Debug, Clone, Serialize)]
pub struct PageIndex {
    /// 1-based page number.
    pub page_number: u32,
    /// Normalized, case-folded, line-break-free text used for matching.
    pub search_text: String,
    /// The same retained text with a newline after every structural line,
    /// including lines whose spans were all filtered out.
    pub display_text: String,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Retained spans must be at least this fraction of the modal font size.
/// Ruby glyphs are typically set at about half body size and footnotes a
/// little larger, so 0.85 drops both while tolerating ordinary size
/// variation inside the body.
const BODY_SIZE_RATIO: f32 = 0.85;

/// Font sizes are bucketed to 0.1pt before the mode is taken, so float
/// jitter from the extractor does not split one logical size into many.
const SIZE_KEY_SCALE: f32 = 10.0;

// ---------------------------------------------------------------------------
// Font-size statistics
// ---------------------------------------------------------------------------

/// Quantise a font size to its 0.1pt histogram key.
fn size_key(size: f32) -> i32 {
    (size * SIZE_KEY_SCALE).round() as i32
}

/// Body-size threshold for a page's spans: the modal 0.1pt-rounded font
/// size scaled by [`BODY_SIZE_RATIO`].
///
/// Ties between equally frequent sizes resolve to the size seen first in
/// scan order, so the result is deterministic for a given span sequence.
/// Returns `None` when there are no spans at all.
pub fn body_size_threshold<'a, I>(spans: I) -> Option<f32>
where
    I: IntoIterator<Item = &'a TextSpan>,
{
    // Scan-ordered counts; a vec keeps first-seen order, which the
    // tie-break below depends on, and pages carry few distinct sizes.
    let mut counts: Vec<(i32, usize)> = Vec::new();
    for span in spans {
        let key = size_key(span.font_size);
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }

    let mut best: Option<(i32, usize)> = None;
    for &(key, n) in &counts {
        match best {
            Some((_, best_n)) if n <= best_n => {}
            _ => best = Some((key, n)),
        }
    }

    best.map(|(key, _)| key as f32 / SIZE_KEY_SCALE * BODY_SIZE_RATIO)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// NFKC-fold and lower-case `text`.
///
/// Full-width/half-width variants collapse to one form and combining marks
/// compose, so queries typed in either width match either width. Applied to
/// every retained span and to every query; offsets computed on one side
/// then always align with the other.
pub fn normalize_text(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

// ---------------------------------------------------------------------------
// Segment pipeline
// ---------------------------------------------------------------------------

/// Classify and normalize one page into its retained [`Segment`] sequence.
///
/// Spans whose raw font size reaches the page's body-size threshold
/// survive, in reading order, each carrying its normalized text, its source
/// bounding box, and its character offset into the flattened page text.
pub fn segment_page(page: &PageStructure) -> Vec<Segment> {
    let Some(threshold) = body_size_threshold(page.spans()) else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    let mut cursor = 0usize;
    for block in &page.blocks {
        for line in &block.lines {
            for span in &line.spans {
                if span.font_size >= threshold {
                    let text = normalize_text(&span.text);
                    let char_len = text.chars().count();
                    segments.push(Segment {
                        text,
                        bbox: span.bbox,
                        char_start: cursor,
                    });
                    cursor += char_len;
                }
            }
        }
    }
    segments
}

/// Build a [`PageIndex`] from a page's structure.
///
/// `search_text` concatenates the segment texts with no separator; a phrase
/// broken across lines therefore stays findable as one substring, at the
/// cost of occasionally fusing the last and first characters of adjacent
/// lines. `display_text` re-walks the lines so a newline lands after each
/// one.
pub fn index_page(page: &PageStructure) -> PageIndex {
    let search_text: String = segment_page(page)
        .iter()
        .map(|segment| segment.text.as_str())
        .collect();

    PageIndex {
        page_number: page.number,
        search_text,
        display_text: display_text(page),
    }
}

/// An empty index for a page whose structure could not be read.
pub fn degraded_page(page_number: u32) -> PageIndex {
    PageIndex {
        page_number,
        search_text: String::new(),
        display_text: String::new(),
    }
}

fn display_text(page: &PageStructure) -> String {
    let Some(threshold) = body_size_threshold(page.spans()) else {
        return String::new();
    };

    let mut out = String::new();
    for block in &page.blocks {
        for line in &block.lines {
            for span in &line.spans {
                if span.font_size >= threshold {
                    out.push_str(&normalize_text(&span.text));
                }
            }
            out.push('\n');
        }
    }
    out
}
