//! Cardsheet packs copies of a postcard-sized image onto a printable sheet and pairs front and
//! back sheets into two-page duplex documents.
//!
//! # Pipeline overview
//!
//! 1. **Measure**: decode the source image and take its physical size at the configured DPI
//! 2. **Solve**: [`solve`] picks the orientation and grid that fits the most cards
//! 3. **Compose**: [`compose_sheet`] centers the card block on the paper and adds dashed cut guides
//! 4. **Pair** (optional): [`pair_documents`] zips fronts with backs into two-page documents
//! 5. **Write**: [`write_pdf`] encodes a [`Document`] with `lopdf`
//!
//! Solving and composing are pure; IO happens only when loading images and writing PDFs.
//! Units are millimetres throughout, with the page origin in the bottom-left corner.
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod config;
mod document;
mod foundation;
mod layout;
mod pdf;
mod pipeline;
mod selection;

pub use assets::decode::{
    SUPPORTED_EXTENSIONS, SourceImage, decode_image, image_id, is_supported_image, load_image,
};
pub use compose::pairing::{pair_documents, paired_id};
pub use compose::sheet::{compose_sheet, compose_sheet_with_layout};
pub use config::catalog::SheetCatalog;
pub use config::settings::{DEFAULT_MARGIN_MM, Settings};
pub use document::fingerprint::{DocumentFingerprint, fingerprint_bytes, fingerprint_document};
pub use document::model::{Document, GuideSegment, ImagePlacement, Page};
pub use foundation::core::{
    Affine, DEFAULT_DPI, Dimension, Line, MM_PER_INCH, PT_PER_INCH, Point, Rect, Vec2, mm_to_pt,
    px_to_mm,
};
pub use foundation::error::{CardsheetError, CardsheetResult};
pub use foundation::fs::{atomic_write, ensure_parent_dir};
pub use layout::cache::LayoutCache;
pub use layout::solver::{
    DEFAULT_MIN_SPACING_MM, LayoutResult, MAX_PLACEMENTS, SheetSpec, calculate,
    choose_orientation, solve,
};
pub use pdf::reader::{
    load_pdf, merge_first_pages, page_count, page_count_file, pair_pdf_files,
};
pub use pdf::writer::{build_pdf, render_pdf, write_pdf};
pub use pipeline::batch::{
    SheetOutput, generate_duplex, generate_sheets, generate_sheets_with_cache,
};
pub use selection::library::{ImageLibrary, Selection};
