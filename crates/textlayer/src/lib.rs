//! Text-layer extraction, search, and preview planning for typeset
//! documents.
//!
//! The pipeline starts from a page's structured text (blocks, lines, and
//! spans with font sizes), keeps only body-sized spans, normalizes what
//! remains, and builds one searchable index per page. Searching those
//! indexes yields hits; locating a hit maps it back to page-space
//! rectangles through the same span walk, so a match in the text always
//! corresponds to geometry on the page. Preview planning turns a located
//! hit into an orientation-aware crop for rendering.
//!
//! ```text
//! StructureProvider -> extract -> PageIndex -> search -> Hit
//!                                    |                    |
//!                                    +-- locate <---------+
//!                                           |
//!                                        preview -> PreviewPlan
//! ```

pub mod extract;
pub mod locate;
pub mod preview;
pub mod provider;
pub mod search;
pub mod session;
pub mod types;

pub use extract::{normalize_text, PageIndex};
pub use types::*;

use std::path::Path;
use std::sync::atomic::AtomicBool;

use crate::provider::{StextFile, StructureProvider};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the text layer.
///
/// Only [`TextLayerError::DocumentOpen`] is terminal for a document. A
/// page whose structure cannot be read degrades to an empty index, and a
/// hit whose geometry cannot be recovered falls back to a full-page
/// preview, so neither aborts a load or a search.
#[derive(Debug, thiserror::Error)]
pub enum TextLayerError {
    #[error("cannot open document: {0}")]
    DocumentOpen(String),
    #[error("page {page}: unreadable structure: {reason}")]
    PageStructure { page: u32, reason: String },
    #[error("page {0} is out of range")]
    PageOutOfRange(u32),
    #[error("render failed: {0}")]
    Render(String),
    #[error("load worker exited without a result")]
    WorkerExited,
}

// ---------------------------------------------------------------------------
// Document facade
// ---------------------------------------------------------------------------

/// The indexed text of a whole document, one [`PageIndex`] per page.
///
/// This is a snapshot: it holds no handle to the source document, so it
/// stays valid however the source changes afterwards. Rendering a preview
/// goes back through a [`StructureProvider`] instead.
#[derive(Debug, Clone)]
pub struct DocumentText {
    pages: Vec<PageIndex>,
}

impl DocumentText {
    pub fn from_pages(pages: Vec<PageIndex>) -> Self {
        DocumentText { pages }
    }

    /// Index every page of `provider` synchronously.
    ///
    /// Background loading with progress and cancellation lives in
    /// [`session`]; this is the direct path for CLI and test use.
    pub fn load<P>(provider: &P) -> Self
    where
        P: StructureProvider + ?Sized,
    {
        let cancel = AtomicBool::new(false);
        let pages = session::load_pages(provider, &cancel, |_| {}).unwrap_or_default();
        DocumentText { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[PageIndex] {
        &self.pages
    }

    /// The index for a 1-based page number.
    pub fn page(&self, page_number: u32) -> Option<&PageIndex> {
        self.pages.iter().find(|page| page.page_number == page_number)
    }

    /// All hits for `query` across the document, in page order.
    pub fn search(&self, query: &str) -> Vec<Hit> {
        search::search_pages(&self.pages, query)
    }
}

/// Open a structured-text file and index every page.
pub fn load_stext_file(path: impl AsRef<Path>) -> Result<DocumentText, TextLayerError> {
    let provider = StextFile::open(path)?;
    Ok(DocumentText::load(&provider))
}
