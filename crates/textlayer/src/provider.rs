//! Document structure access.
//!
//! The engine never parses page containers itself. Structured text arrives
//! through the [`StructureProvider`] trait, and rasterization is handed
//! back to the caller through [`Rasterizer`]. The one concrete provider in
//! this crate, [`StextFile`], reads a structured-text JSON dump: the
//! blocks/lines/spans schema of PyMuPDF's `page.get_text("dict")`, wrapped
//! in a top-level `pages` array.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::types::{PageStructure, Rect, TextBlock, TextLine, TextSpan};
use crate::TextLayerError;

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Access to a document's structured text, one page at a time.
///
/// The implementor owns whatever handle the underlying parser needs;
/// dropping the provider closes the document.
pub trait StructureProvider {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Structured text for a 1-based page number.
    fn page_structure(&self, page_number: u32) -> Result<PageStructure, TextLayerError>;
}

/// A rendered clip of a page, 8-bit RGB, row-major.
#[derive(Debug, Clone)]
pub struct Pixmap {
    pub width: u32,
    pub height: u32,
    pub samples: Vec<u8>,
}

/// Rasterization capability supplied by the caller.
///
/// Implementations are not assumed safe for concurrent calls on one
/// document handle; the methods take `&mut self` so preview requests
/// serialize naturally.
pub trait Rasterizer {
    /// Render `clip` of a page scaled by `zoom`.
    fn render(&mut self, page_number: u32, clip: Rect, zoom: f32)
        -> Result<Pixmap, TextLayerError>;

    /// Cosmetic highlight for a located hit. Default: no-op.
    fn annotate_highlight(&mut self, _page_number: u32, _rect: Rect) -> Result<(), TextLayerError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Structured-text JSON provider
// ---------------------------------------------------------------------------

// Raw serde shapes for the interchange schema. Kept apart from the crate
// model so schema quirks (numeric type tags, bbox arrays, extra fields)
// stay at this boundary.

#[derive(Debug, Deserialize)]
struct RawDocument {
    pages: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    width: f32,
    height: f32,
    #[serde(default)]
    blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    /// 0 = text, 1 = image.
    #[serde(rename = "type", default)]
    kind: i64,
    bbox: [f32; 4],
    #[serde(default)]
    lines: Vec<RawLine>,
}

#[derive(Debug, Deserialize)]
struct RawLine {
    bbox: [f32; 4],
    #[serde(default)]
    spans: Vec<RawSpan>,
}

#[derive(Debug, Deserialize)]
struct RawSpan {
    text: String,
    size: f32,
    bbox: [f32; 4],
}

fn rect_from(bbox: [f32; 4]) -> Rect {
    Rect::new(bbox[0], bbox[1], bbox[2], bbox[3])
}

/// [`StructureProvider`] over a structured-text JSON dump.
///
/// The document-level shape is validated at open; individual pages are
/// decoded per request, so one malformed page degrades that page without
/// poisoning the rest of the document.
#[derive(Debug)]
pub struct StextFile {
    raw_pages: Vec<serde_json::Value>,
}

impl StextFile {
    /// Open a dump from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TextLayerError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| TextLayerError::DocumentOpen(format!("{}: {e}", path.display())))?;
        Self::from_json(&bytes)
    }

    /// Parse a dump already in memory.
    pub fn from_json(bytes: &[u8]) -> Result<Self, TextLayerError> {
        let raw: RawDocument = serde_json::from_slice(bytes).map_err(|e| {
            TextLayerError::DocumentOpen(format!("invalid structured-text JSON: {e}"))
        })?;
        Ok(StextFile {
            raw_pages: raw.pages,
        })
    }
}

impl StructureProvider for StextFile {
    fn page_count(&self) -> usize {
        self.raw_pages.len()
    }

    fn page_structure(&self, page_number: u32) -> Result<PageStructure, TextLayerError> {
        let index = (page_number as usize)
            .checked_sub(1)
            .filter(|i| *i < self.raw_pages.len())
            .ok_or(TextLayerError::PageOutOfRange(page_number))?;

        let raw: RawPage = serde_json::from_value(self.raw_pages[index].clone()).map_err(|e| {
            TextLayerError::PageStructure {
                page: page_number,
                reason: e.to_string(),
            }
        })?;

        Ok(convert_page(page_number, raw))
    }
}

fn convert_page(number: u32, raw: RawPage) -> PageStructure {
    let blocks = raw
        .blocks
        .into_iter()
        .filter(|block| block.kind == 0)
        .map(|block| TextBlock {
            bbox: rect_from(block.bbox),
            lines: block
                .lines
                .into_iter()
                .map(|line| TextLine {
                    bbox: rect_from(line.bbox),
                    spans: line
                        .spans
                        .into_iter()
                        .map(|span| TextSpan {
                            text: span.text,
                            font_size: span.size,
                            bbox: rect_from(span.bbox),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    PageStructure {
        number,
        bounds: Rect::new(0.0, 0.0, raw.width, raw.height),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_PAGE_DOC: &str = r#"{
      "pages": [
        {
          "width": 595.0,
          "height": 842.0,
          "blocks": [
            {
              "type": 0,
              "bbox": [50.0, 50.0, 300.0, 80.0],
              "lines": [
                {
                  "bbox": [50.0, 50.0, 300.0, 80.0],
                  "spans": [
                    {"text": "本文のことば", "size": 10.5, "bbox": [50.0, 50.0, 300.0, 80.0], "font": "Mincho", "flags": 4}
                  ]
                }
              ]
            },
            {
              "type": 1,
              "bbox": [400.0, 400.0, 500.0, 500.0]
            }
          ]
        },
        {
          "width": 595.0,
          "height": 842.0,
          "blocks": []
        }
      ]
    }"#;

    #[test]
    fn test_from_json_counts_pages() {
        let doc = StextFile::from_json(TWO_PAGE_DOC.as_bytes()).unwrap();
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_page_structure_maps_spans_and_drops_images() {
        let doc = StextFile::from_json(TWO_PAGE_DOC.as_bytes()).unwrap();
        let page = doc.page_structure(1).unwrap();

        assert_eq!(page.number, 1);
        assert_eq!(page.bounds, Rect::new(0.0, 0.0, 595.0, 842.0));
        // The image block is gone.
        assert_eq!(page.blocks.len(), 1);

        let span = &page.blocks[0].lines[0].spans[0];
        assert_eq!(span.text, "本文のことば");
        assert_eq!(span.font_size, 10.5);
        assert_eq!(span.bbox, Rect::new(50.0, 50.0, 300.0, 80.0));
    }

    #[test]
    fn test_page_structure_empty_page() {
        let doc = StextFile::from_json(TWO_PAGE_DOC.as_bytes()).unwrap();
        let page = doc.page_structure(2).unwrap();
        assert!(page.blocks.is_empty());
    }

    #[test]
    fn test_page_out_of_range() {
        let doc = StextFile::from_json(TWO_PAGE_DOC.as_bytes()).unwrap();
        assert!(matches!(
            doc.page_structure(0),
            Err(TextLayerError::PageOutOfRange(0))
        ));
        assert!(matches!(
            doc.page_structure(3),
            Err(TextLayerError::PageOutOfRange(3))
        ));
    }

    #[test]
    fn test_malformed_page_degrades_only_that_page() {
        let json = r#"{
          "pages": [
            {"width": "not-a-number", "height": 842.0, "blocks": []},
            {"width": 595.0, "height": 842.0, "blocks": []}
          ]
        }"#;
        let doc = StextFile::from_json(json.as_bytes()).unwrap();
        assert!(matches!(
            doc.page_structure(1),
            Err(TextLayerError::PageStructure { page: 1, .. })
        ));
        assert!(doc.page_structure(2).is_ok());
    }

    #[test]
    fn test_document_without_pages_fails_to_open() {
        let err = StextFile::from_json(b"{\"not_pages\": []}").unwrap_err();
        assert!(matches!(err, TextLayerError::DocumentOpen(_)));

        let err = StextFile::from_json(b"garbage").unwrap_err();
        assert!(matches!(err, TextLayerError::DocumentOpen(_)));
    }

    #[test]
    fn test_open_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_PAGE_DOC.as_bytes()).unwrap();
        let doc = StextFile::open(file.path()).unwrap();
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_open_missing_file_is_open_error() {
        let err = StextFile::open("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, TextLayerError::DocumentOpen(_)));
    }
}
