//! Orientation classification and crop planning for hit previews.
//!
//! A located hit is a small rectangle on a large page. To show it usefully
//! the page is cropped along the axis the text runs on: vertical text gets
//! the full page height and a narrow horizontal band around the hit,
//! horizontal text the full page width and a shallow vertical band. The
//! writing direction itself is inferred from aspect ratios, falling back
//! to the structural block and line around the hit when the rectangle is
//! too square to tell.

use crate::locate;
use crate::provider::{Pixmap, Rasterizer, StructureProvider};
use crate::types::{CropTarget, Orientation, PageStructure, PreviewPlan, Rect};
use crate::TextLayerError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Height/width ratio above which a rectangle reads as vertical text.
const VERTICAL_RATIO: f32 = 1.2;

/// Height/width ratio below which a rectangle reads as horizontal text.
const HORIZONTAL_RATIO: f32 = 0.8;

/// Tie-break ratio when neither the rectangle nor its containers decide.
/// Deliberately biased toward vertical; near-square hits in the corpora
/// this serves are usually short runs of vertical text.
const FALLBACK_RATIO: f32 = 0.9;

/// Horizontal padding around a vertical-text hit, in page units.
const VERTICAL_PAD_X: f32 = 150.0;

/// Vertical padding around a horizontal-text hit, in page units.
const HORIZONTAL_PAD_Y: f32 = 100.0;

/// Zoom for the full-page fallback thumbnail.
pub const THUMBNAIL_ZOOM: f32 = 0.4;

/// Zoom when a hit was located.
pub const DETAIL_ZOOM: f32 = 2.0;

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Classify the writing direction of the text under `rect`.
///
/// Clear aspect ratios decide immediately. Near-square rectangles defer to
/// the structural block containing the rectangle's center or intersecting
/// it, then to that block's lines; a block that matches but stays
/// ambiguous does not stop the walk. When nothing resolves, fall back to
/// comparing the ratio against [`FALLBACK_RATIO`].
pub fn classify_orientation(page: &PageStructure, rect: &Rect) -> Orientation {
    let width = rect.width();
    let height = rect.height();
    if width <= 0.0 {
        return Orientation::Vertical;
    }

    let ratio = height / width;
    if ratio > VERTICAL_RATIO {
        return Orientation::Vertical;
    }
    if ratio < HORIZONTAL_RATIO {
        return Orientation::Horizontal;
    }

    let center = rect.center();
    for block in &page.blocks {
        if !(block.bbox.contains(center) || block.bbox.intersects(rect)) {
            continue;
        }
        let bw = block.bbox.width();
        let bh = block.bbox.height();
        if bh > bw * VERTICAL_RATIO {
            return Orientation::Vertical;
        }
        if bw > bh * VERTICAL_RATIO {
            return Orientation::Horizontal;
        }
        for line in &block.lines {
            if line.bbox.contains(center) || line.bbox.intersects(rect) {
                return if line.bbox.height() > line.bbox.width() {
                    Orientation::Vertical
                } else {
                    Orientation::Horizontal
                };
            }
        }
    }

    if ratio > FALLBACK_RATIO {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

// ---------------------------------------------------------------------------
// Crop planning
// ---------------------------------------------------------------------------

/// Clip rectangle and zoom for previewing `target` on a page with
/// `page_rect` bounds.
///
/// Vertical hits keep the full page height and pad horizontally;
/// horizontal hits keep the full page width and pad vertically. Clips are
/// clamped to the page, and no target (or a degenerate result) means the
/// whole page at thumbnail zoom.
pub fn plan_crop(page_rect: &Rect, target: Option<&CropTarget>) -> (Rect, f32) {
    let Some(target) = target else {
        return (*page_rect, THUMBNAIL_ZOOM);
    };

    let page_w = page_rect.width();
    let page_h = page_rect.height();
    let r = target.union_rect;
    let clip = match target.orientation {
        Orientation::Vertical => Rect::new(
            (r.x0 - VERTICAL_PAD_X).max(0.0),
            0.0,
            (r.x1 + VERTICAL_PAD_X).min(page_w),
            page_h,
        ),
        Orientation::Horizontal => Rect::new(
            0.0,
            (r.y0 - HORIZONTAL_PAD_Y).max(0.0),
            page_w,
            (r.y1 + HORIZONTAL_PAD_Y).min(page_h),
        ),
    };

    if clip.is_degenerate() {
        return (*page_rect, THUMBNAIL_ZOOM);
    }
    (clip, DETAIL_ZOOM)
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Resolve geometry for one occurrence: union rectangle plus orientation.
pub fn locate_target(
    page: &PageStructure,
    query: &str,
    occurrence_index: usize,
) -> Option<CropTarget> {
    let rect = locate::locate_occurrence(page, query, occurrence_index)?;
    let orientation = classify_orientation(page, &rect);
    Some(CropTarget {
        union_rect: rect,
        orientation,
    })
}

/// Full preview plan for a page: locate the hit, classify its orientation,
/// plan the crop.
///
/// With no query, or a query whose text is absent from the page's body
/// text, the plan is the unclipped page at thumbnail zoom with no
/// highlight. A located hit whose padded crop collapses outside the page
/// gets the same fallback plan.
pub fn plan_preview<P>(
    provider: &P,
    page_number: u32,
    query: Option<&str>,
    occurrence_index: usize,
) -> Result<PreviewPlan, TextLayerError>
where
    P: StructureProvider + ?Sized,
{
    let page = provider.page_structure(page_number)?;
    let target = query.and_then(|q| locate_target(&page, q, occurrence_index));
    if query.is_some() && target.is_none() {
        log::debug!("page {page_number}: falling back to full-page preview");
    }

    let (clip, zoom) = plan_crop(&page.bounds, target.as_ref());
    // Fallback thumbnails carry no highlight.
    let highlight = if zoom == DETAIL_ZOOM {
        target.map(|t| t.union_rect)
    } else {
        None
    };
    Ok(PreviewPlan {
        page_number,
        clip,
        zoom,
        highlight,
    })
}

/// Drive a [`Rasterizer`] with a computed plan.
///
/// The highlight is annotated first so it lands in the rendered pixels; a
/// highlight failure is cosmetic and only logged.
pub fn render_plan<R>(rasterizer: &mut R, plan: &PreviewPlan) -> Result<Pixmap, TextLayerError>
where
    R: Rasterizer + ?Sized,
{
    if let Some(rect) = plan.highlight {
        if let Err(err) = rasterizer.annotate_highlight(plan.page_number, rect) {
            log::debug!("highlight failed on page {}: {err}", plan.page_number);
        }
    }
    rasterizer.render(plan.page_number, plan.clip, plan.zoom)
}
