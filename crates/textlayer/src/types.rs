//! Core data model: geometry value types, the structured-text span model,
//! and the search/preview result types.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point in page coordinates (origin top-left, units in points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// An axis-aligned rectangle stored as its two corners `(x0, y0)`..`(x1, y1)`.
///
/// All arithmetic returns new values; union chains never alias or mutate a
/// span's source geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Rect { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> Point {
        Point {
            x: (self.x0 + self.x1) / 2.0,
            y: (self.y0 + self.y1) / 2.0,
        }
    }

    /// A rectangle with no area (inverted or collapsed corners).
    pub fn is_degenerate(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Boundary-inclusive point test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    /// True when the two rectangles share positive area. Rectangles that
    /// merely touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Smallest rectangle containing both inputs.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

// ---------------------------------------------------------------------------
// Structured-text span model
// ---------------------------------------------------------------------------

/// A contiguous run of text sharing one font size and one bounding box, as
/// reported by the document structure provider.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub font_size: f32,
    pub bbox: Rect,
}

/// One structural line of spans.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub bbox: Rect,
    pub spans: Vec<TextSpan>,
}

/// One structural block of lines. Image blocks are dropped at ingest, so
/// only text blocks appear here.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub bbox: Rect,
    pub lines: Vec<TextLine>,
}

/// A page's structured text as supplied by a structure provider.
#[derive(Debug, Clone)]
pub struct PageStructure {
    /// 1-based page number.
    pub number: u32,
    /// The page rectangle, anchored at the origin.
    pub bounds: Rect,
    pub blocks: Vec<TextBlock>,
}

impl PageStructure {
    /// All spans in reading order (blocks, then lines, then spans).
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.blocks
            .iter()
            .flat_map(|block| block.lines.iter())
            .flat_map(|line| line.spans.iter())
    }
}

// ---------------------------------------------------------------------------
// Search and preview results
// ---------------------------------------------------------------------------

/// One search match. Offsets are character counts into the page's
/// `search_text`, not byte offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub page_number: u32,
    pub char_start: usize,
    pub char_end: usize,
    /// The match with up to 20 characters of surrounding text on each side.
    pub context: String,
    /// 0-based count of this match within its page, in scan order.
    pub occurrence_index: usize,
}

/// Writing direction of the text under a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Geometry resolved for one specific hit: the union of the bounding boxes
/// of the spans that produced it, plus its writing direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropTarget {
    pub union_rect: Rect,
    pub orientation: Orientation,
}

/// What to ask the rasterizer for: a clip, a zoom factor, and an optional
/// highlight rectangle for the located text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewPlan {
    pub page_number: u32,
    pub clip: Rect,
    pub zoom: f32,
    pub highlight: Option<Rect>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(10.0, 20.0, 110.0, 70.0);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 50.0);
        let c = r.center();
        assert_eq!(c.x, 60.0);
        assert_eq!(c.y, 45.0);
    }

    #[test]
    fn test_rect_union_expands_both_ways() {
        let a = Rect::new(10.0, 10.0, 20.0, 20.0);
        let b = Rect::new(0.0, 15.0, 15.0, 40.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0.0, 10.0, 20.0, 40.0));
        // Inputs are untouched.
        assert_eq!(a, Rect::new(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn test_rect_intersects_requires_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let overlapping = Rect::new(5.0, 5.0, 15.0, 15.0);
        let touching = Rect::new(10.0, 0.0, 20.0, 10.0);
        let apart = Rect::new(30.0, 30.0, 40.0, 40.0);
        assert!(a.intersects(&overlapping));
        assert!(!a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_rect_contains_is_boundary_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point { x: 0.0, y: 0.0 }));
        assert!(r.contains(Point { x: 10.0, y: 10.0 }));
        assert!(r.contains(Point { x: 5.0, y: 5.0 }));
        assert!(!r.contains(Point { x: 10.1, y: 5.0 }));
    }

    #[test]
    fn test_rect_degenerate() {
        assert!(Rect::new(10.0, 0.0, 10.0, 5.0).is_degenerate());
        assert!(Rect::new(10.0, 5.0, 0.0, 10.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_page_structure_span_order() {
        let span = |text: &str| TextSpan {
            text: text.to_string(),
            font_size: 10.0,
            bbox: Rect::new(0.0, 0.0, 1.0, 1.0),
        };
        let page = PageStructure {
            number: 1,
            bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            blocks: vec![
                TextBlock {
                    bbox: Rect::new(0.0, 0.0, 1.0, 1.0),
                    lines: vec![
                        TextLine {
                            bbox: Rect::new(0.0, 0.0, 1.0, 1.0),
                            spans: vec![span("a"), span("b")],
                        },
                        TextLine {
                            bbox: Rect::new(0.0, 0.0, 1.0, 1.0),
                            spans: vec![span("c")],
                        },
                    ],
                },
                TextBlock {
                    bbox: Rect::new(0.0, 0.0, 1.0, 1.0),
                    lines: vec![TextLine {
                        bbox: Rect::new(0.0, 0.0, 1.0, 1.0),
                        spans: vec![span("d")],
                    }],
                },
            ],
        };
        let texts: Vec<&str> = page.spans().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_orientation_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Orientation::Vertical).unwrap(),
            "\"vertical\""
        );
        assert_eq!(
            serde_json::to_string(&Orientation::Horizontal).unwrap(),
            "\"horizontal\""
        );
    }
}
