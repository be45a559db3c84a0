use std::sync::Arc;

use crate::{
    assets::decode::SourceImage,
    foundation::core::{Affine, Dimension, Line, Rect},
};

/// Exact 90 degree counter-clockwise turn (avoids `cos(pi/2)` round-off).
const QUARTER_TURN: Affine = Affine::new([0.0, 1.0, -1.0, 0.0, 0.0, 0.0]);

/// One copy of a source image drawn into a grid cell.
///
/// Coordinates are millimetres with the origin at the bottom-left corner of the page.
#[derive(Clone, Debug)]
pub struct ImagePlacement {
    /// Shared pixels; every cell of a sheet points at the same image.
    pub image: Arc<SourceImage>,
    /// Cell the image is fit into.
    pub cell: Rect,
    /// Whether the image is drawn turned by 90 degrees.
    pub rotated: bool,
    /// Maps the unit square (image space) onto the page.
    pub transform: Affine,
}

impl ImagePlacement {
    /// Fit `image` into `cell` with uniform scaling, centered.
    ///
    /// When `rotated`, the image is turned counter-clockwise about the cell's bottom-right
    /// corner and fit into the swapped extent, so its width runs along the cell height.
    pub fn fit(image: Arc<SourceImage>, cell: Rect, rotated: bool) -> Self {
        let aspect = image.aspect_ratio();
        let transform = if rotated {
            let (draw_w, draw_h) = fit_extent(aspect, cell.height(), cell.width());
            let dx = (cell.height() - draw_w) / 2.0;
            let dy = (cell.width() - draw_h) / 2.0;
            Affine::translate((cell.x1, cell.y0))
                * QUARTER_TURN
                * Affine::translate((dx, dy))
                * Affine::scale_non_uniform(draw_w, draw_h)
        } else {
            let (draw_w, draw_h) = fit_extent(aspect, cell.width(), cell.height());
            let dx = (cell.width() - draw_w) / 2.0;
            let dy = (cell.height() - draw_h) / 2.0;
            Affine::translate((cell.x0 + dx, cell.y0 + dy))
                * Affine::scale_non_uniform(draw_w, draw_h)
        };
        Self {
            image,
            cell,
            rotated,
            transform,
        }
    }

    /// Page-space bounding box of the drawn image.
    pub fn drawn_bounds(&self) -> Rect {
        self.transform
            .transform_rect_bbox(Rect::new(0.0, 0.0, 1.0, 1.0))
    }
}

/// Largest `(w, h)` with `w / h == aspect` inside `box_w x box_h`.
fn fit_extent(aspect: f64, box_w: f64, box_h: f64) -> (f64, f64) {
    if box_w <= 0.0 || box_h <= 0.0 || !aspect.is_finite() || aspect <= 0.0 {
        return (0.0, 0.0);
    }
    if box_w / box_h > aspect {
        (box_h * aspect, box_h)
    } else {
        (box_w, box_w / aspect)
    }
}

/// Dashed cut mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideSegment {
    /// Segment in page millimetres.
    pub line: Line,
}

impl GuideSegment {
    /// Segment between two page points.
    pub fn new(from: (f64, f64), to: (f64, f64)) -> Self {
        Self {
            line: Line::new(from, to),
        }
    }
}

/// Fixed-size canvas holding image placements and guide marks.
#[derive(Clone, Debug)]
pub struct Page {
    size: Dimension,
    images: Vec<ImagePlacement>,
    guides: Vec<GuideSegment>,
}

impl Page {
    /// Freeze a page; it cannot be changed afterwards.
    pub fn new(size: Dimension, images: Vec<ImagePlacement>, guides: Vec<GuideSegment>) -> Self {
        Self {
            size,
            images,
            guides,
        }
    }

    /// Physical page size in mm.
    pub fn size(&self) -> Dimension {
        self.size
    }

    /// Image placements in drawing order (row-major, top row first for sheets).
    pub fn images(&self) -> &[ImagePlacement] {
        &self.images
    }

    /// Cut marks.
    pub fn guides(&self) -> &[GuideSegment] {
        &self.guides
    }
}

/// Ordered pages handed back to callers and to the pairing composer.
#[derive(Clone, Debug)]
pub struct Document {
    id: String,
    pages: Vec<Page>,
}

impl Document {
    /// Wrap finished pages under a name.
    pub fn new(id: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            id: id.into(),
            pages,
        }
    }

    /// Deterministic name, used for output file names.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// First page, if any.
    pub fn first_page(&self) -> Option<&Page> {
        self.pages.first()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
