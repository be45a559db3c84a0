use std::{path::Path, sync::Arc};

use crate::{
    assets::decode::{SourceImage, load_image},
    config::settings::Settings,
    document::model::{Document, GuideSegment, ImagePlacement, Page},
    foundation::{core::Rect, error::CardsheetResult},
    layout::solver::{LayoutResult, SheetSpec, solve},
};

/// Load `image_path`, measure it at the configured DPI, solve the layout and compose one page.
///
/// Nothing is written; use [`crate::write_pdf`] to persist the result.
#[tracing::instrument(skip_all, fields(path = %image_path.display()))]
pub fn compose_sheet(
    image_path: &Path,
    sheet: &SheetSpec,
    settings: &Settings,
) -> CardsheetResult<Document> {
    let image = Arc::new(load_image(image_path)?);
    let card = image.physical_size(settings.dpi);
    let layout = solve(card, sheet.usable(), settings.min_spacing_mm);
    Ok(compose_sheet_with_layout(&image, sheet, &layout))
}

/// Lay out copies of `image` according to an already solved `layout`. Pure.
///
/// The card block is centered on the full paper; every cell shares the same image handle.
pub fn compose_sheet_with_layout(
    image: &Arc<SourceImage>,
    sheet: &SheetSpec,
    layout: &LayoutResult,
) -> Document {
    let grid = SheetGrid::new(sheet, layout);

    let mut images = Vec::with_capacity(layout.total as usize);
    for row in 0..layout.rows {
        for col in 0..layout.columns {
            images.push(ImagePlacement::fit(
                Arc::clone(image),
                grid.cell(row, col),
                layout.rotated,
            ));
        }
    }

    let guides = grid.guides(sheet.margin);
    tracing::debug!(
        id = %image.id,
        placements = images.len(),
        guides = guides.len(),
        rotated = layout.rotated,
        "composed sheet"
    );

    Document::new(
        image.id.clone(),
        vec![Page::new(sheet.paper, images, guides)],
    )
}

/// Grid geometry in page millimetres (origin bottom-left).
struct SheetGrid<'a> {
    layout: &'a LayoutResult,
    paper_w: f64,
    paper_h: f64,
    x_start: f64,
    y_start: f64,
}

impl<'a> SheetGrid<'a> {
    fn new(sheet: &SheetSpec, layout: &'a LayoutResult) -> Self {
        let occupied = layout.occupied();
        Self {
            layout,
            paper_w: sheet.paper.width,
            paper_h: sheet.paper.height,
            x_start: (sheet.paper.width - occupied.width) / 2.0,
            y_start: (sheet.paper.height - occupied.height) / 2.0,
        }
    }

    fn column_x(&self, col: u32) -> f64 {
        self.x_start + f64::from(col) * (self.layout.card_width + self.layout.x_spacing)
    }

    // Rows count downward from the top edge.
    fn row_top(&self, row: u32) -> f64 {
        self.paper_h
            - (self.y_start + f64::from(row) * (self.layout.card_height + self.layout.y_spacing))
    }

    fn cell(&self, row: u32, col: u32) -> Rect {
        let x = self.column_x(col);
        let top = self.row_top(row);
        Rect::new(x, top - self.layout.card_height, x + self.layout.card_width, top)
    }

    // Short ticks at each grid boundary, running inward from the paper edge by `margin`.
    fn guides(&self, margin: f64) -> Vec<GuideSegment> {
        let (w, h) = (self.paper_w, self.paper_h);
        let mut guides =
            Vec::with_capacity(2 * (self.layout.columns as usize + self.layout.rows as usize + 2));
        for i in 0..=self.layout.columns {
            let x = self.column_x(i);
            guides.push(GuideSegment::new((x, 0.0), (x, margin)));
            guides.push(GuideSegment::new((x, h), (x, h - margin)));
        }
        for i in 0..=self.layout.rows {
            let y = self.row_top(i);
            guides.push(GuideSegment::new((0.0, y), (margin, y)));
            guides.push(GuideSegment::new((w, y), (w - margin, y)));
        }
        guides
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/sheet.rs"]
mod tests;
