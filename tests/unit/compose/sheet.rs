use std::path::PathBuf;

use super::*;
use crate::{
    document::fingerprint::fingerprint_document,
    foundation::{core::Dimension, error::CardsheetError},
    layout::solver::{DEFAULT_MIN_SPACING_MM, calculate},
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn image(id: &str, width: u32, height: u32) -> Arc<SourceImage> {
    Arc::new(
        SourceImage::from_rgba8(id, width, height, vec![200; (width * height * 4) as usize])
            .unwrap(),
    )
}

fn postcard_sheet() -> (SheetSpec, LayoutResult) {
    let sheet = SheetSpec::new(Dimension::new(500.0, 700.0), 10.0);
    let layout = calculate(
        Dimension::new(50.0, 70.0),
        sheet.paper,
        sheet.margin,
        DEFAULT_MIN_SPACING_MM,
    );
    (sheet, layout)
}

#[test]
fn one_page_with_one_placement_per_card() {
    let (sheet, layout) = postcard_sheet();
    let doc = compose_sheet_with_layout(&image("card", 50, 70), &sheet, &layout);
    assert_eq!(doc.id(), "card");
    assert_eq!(doc.page_count(), 1);
    let page = doc.first_page().unwrap();
    assert_eq!(page.size(), sheet.paper);
    assert_eq!(page.images().len(), 81);
    assert!(page.images().iter().all(|p| !p.rotated));
    assert!(
        page.images()
            .iter()
            .all(|p| Arc::ptr_eq(&p.image, &page.images()[0].image))
    );
}

#[test]
fn block_is_centered_and_top_row_comes_first() {
    let (sheet, layout) = postcard_sheet();
    let doc = compose_sheet_with_layout(&image("card", 50, 70), &sheet, &layout);
    let images = doc.first_page().unwrap().images();

    // occupied 474 x 670 on 500 x 700
    let first = images[0].cell;
    assert!(approx(first.x0, 13.0));
    assert!(approx(first.y1, 685.0));
    assert!(approx(first.y0, 615.0));

    let second = images[1].cell;
    assert!(approx(second.x0, 13.0 + 53.0));
    assert!(approx(second.y0, first.y0));

    let below = images[9].cell;
    assert!(approx(below.x0, first.x0));
    assert!(approx(below.y1, first.y0 - 5.0));

    let last = images[80].cell;
    assert!(approx(last.x1, 487.0));
    assert!(approx(last.y0, 15.0));
}

#[test]
fn block_plus_outer_gaps_spans_the_usable_area() {
    let (sheet, layout) = postcard_sheet();
    let doc = compose_sheet_with_layout(&image("card", 50, 70), &sheet, &layout);
    let images = doc.first_page().unwrap().images();
    let first = images.first().unwrap().cell;
    let last = images.last().unwrap().cell;

    assert!(approx(first.x0 - layout.x_spacing, sheet.margin));
    assert!(approx(last.x1 + layout.x_spacing, sheet.paper.width - sheet.margin));
    assert!(approx(last.y0 - layout.y_spacing, sheet.margin));
    assert!(approx(first.y1 + layout.y_spacing, sheet.paper.height - sheet.margin));
}

#[test]
fn guides_mark_every_boundary_on_all_edges() {
    let (sheet, layout) = postcard_sheet();
    let doc = compose_sheet_with_layout(&image("card", 50, 70), &sheet, &layout);
    let guides = doc.first_page().unwrap().guides();
    assert_eq!(guides.len(), 2 * 10 + 2 * 10);

    let bottom = guides[0].line;
    assert!(approx(bottom.p0.x, 13.0) && approx(bottom.p0.y, 0.0));
    assert!(approx(bottom.p1.x, 13.0) && approx(bottom.p1.y, 10.0));
    let top = guides[1].line;
    assert!(approx(top.p0.y, 700.0) && approx(top.p1.y, 690.0));

    let left = guides[20].line;
    assert!(approx(left.p0.x, 0.0) && approx(left.p1.x, 10.0));
    assert!(approx(left.p0.y, 685.0));
    let right = guides[21].line;
    assert!(approx(right.p0.x, 500.0) && approx(right.p1.x, 490.0));

    for g in guides {
        assert!(approx((g.line.p1 - g.line.p0).hypot(), sheet.margin));
    }
}

#[test]
fn rotated_layout_turns_every_placement() {
    let sheet = SheetSpec::new(Dimension::new(8.5, 11.0), 0.25);
    let layout = calculate(
        Dimension::new(4.0, 6.0),
        sheet.paper,
        sheet.margin,
        DEFAULT_MIN_SPACING_MM,
    );
    assert!(layout.rotated);

    let doc = compose_sheet_with_layout(&image("photo", 40, 60), &sheet, &layout);
    let images = doc.first_page().unwrap().images();
    assert_eq!(images.len(), 2);
    for p in images {
        assert!(p.rotated);
        assert!(approx(p.cell.width(), 6.0));
        assert!(approx(p.cell.height(), 4.0));
        let drawn = p.drawn_bounds();
        assert!(approx(drawn.width(), 6.0));
        assert!(approx(drawn.height(), 4.0));
    }
}

#[test]
fn empty_layout_still_marks_the_center() {
    let sheet = SheetSpec::new(Dimension::new(100.0, 100.0), 5.0);
    let layout = calculate(
        Dimension::new(600.0, 800.0),
        sheet.paper,
        sheet.margin,
        DEFAULT_MIN_SPACING_MM,
    );
    assert_eq!(layout.total, 0);

    let doc = compose_sheet_with_layout(&image("big", 6, 8), &sheet, &layout);
    let page = doc.first_page().unwrap();
    assert!(page.images().is_empty());
    assert_eq!(page.guides().len(), 4);
    assert!(approx(page.guides()[0].line.p0.x, 50.0));
    assert!(approx(page.guides()[2].line.p0.y, 50.0));
}

#[test]
fn microscopic_card_composes_as_empty_sheet() {
    let sheet = SheetSpec::new(Dimension::new(210.0, 310.0), 5.0);
    let layout = solve(Dimension::new(0.001, 0.001), sheet.usable(), 0.0);
    assert!(layout.is_empty());

    let doc = compose_sheet_with_layout(&image("dust", 1, 1), &sheet, &layout);
    let page = doc.first_page().unwrap();
    assert!(page.images().is_empty());
    assert_eq!(page.guides().len(), 4);
}

#[test]
fn composing_twice_is_deterministic() {
    let (sheet, layout) = postcard_sheet();
    let a = compose_sheet_with_layout(&image("card", 50, 70), &sheet, &layout);
    let b = compose_sheet_with_layout(&image("card", 50, 70), &sheet, &layout);
    assert_eq!(fingerprint_document(&a), fingerprint_document(&b));
}

#[test]
fn missing_image_is_not_found() {
    let sheet = Settings::default().sheet(Some("A4")).unwrap();
    let err = compose_sheet(
        Path::new("/nonexistent/cardsheet/card.png"),
        &sheet,
        &Settings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CardsheetError::NotFound(_)));
}

#[test]
fn compose_from_file_uses_stem_and_dpi() {
    let dir: PathBuf = std::env::temp_dir().join(format!(
        "cardsheet_compose_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("postcard.png");
    // 1 x 1.5 inches at 300 dpi
    image::RgbImage::from_pixel(300, 450, image::Rgb([10, 20, 30]))
        .save(&path)
        .unwrap();

    let settings = Settings::default();
    let sheet = settings.sheet(Some("Letter")).unwrap();
    let doc = compose_sheet(&path, &sheet, &settings).unwrap();
    assert_eq!(doc.id(), "postcard");

    let expected = solve(
        Dimension::new(25.4, 38.1),
        sheet.usable(),
        settings.min_spacing_mm,
    );
    assert!(expected.total > 0);
    assert_eq!(
        doc.first_page().unwrap().images().len(),
        expected.total as usize
    );

    std::fs::remove_dir_all(&dir).ok();
}
