use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    assets::decode::load_image,
    compose::{pairing::pair_documents, sheet::compose_sheet_with_layout},
    config::settings::Settings,
    document::model::Document,
    foundation::error::{CardsheetError, CardsheetResult},
    layout::{
        cache::LayoutCache,
        solver::{LayoutResult, SheetSpec},
    },
    pdf::writer::write_pdf,
};

/// One written sheet.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SheetOutput {
    /// Source image.
    pub image: PathBuf,
    /// Written PDF, `"{stem}.pdf"` under the output directory.
    pub pdf: PathBuf,
    /// Number of cards on the sheet.
    pub total: u32,
    /// Whether the cards were turned to fit more of them.
    pub rotated: bool,
}

/// Compose and write one sheet PDF per image into `out_dir`.
///
/// Items are processed in order; the first failure stops the batch and earlier files stay
/// written.
pub fn generate_sheets(
    images: &[PathBuf],
    sheet: &SheetSpec,
    settings: &Settings,
    out_dir: &Path,
) -> CardsheetResult<Vec<SheetOutput>> {
    generate_sheets_with_cache(images, sheet, settings, out_dir, &mut LayoutCache::new())
}

/// [`generate_sheets`] with a caller-owned layout cache, reused across batches.
#[tracing::instrument(skip_all, fields(images = images.len(), out_dir = %out_dir.display()))]
pub fn generate_sheets_with_cache(
    images: &[PathBuf],
    sheet: &SheetSpec,
    settings: &Settings,
    out_dir: &Path,
    cache: &mut LayoutCache,
) -> CardsheetResult<Vec<SheetOutput>> {
    settings.validate()?;
    let mut outputs = Vec::with_capacity(images.len());
    for image in images {
        let (doc, layout) = compose_fitting(image, sheet, settings, cache)?;
        let pdf = out_dir.join(format!("{}.pdf", doc.id()));
        write_pdf(&doc, &pdf)?;
        outputs.push(SheetOutput {
            image: image.clone(),
            pdf,
            total: layout.total,
            rotated: layout.rotated,
        });
    }
    tracing::debug!(
        hits = cache.hits(),
        misses = cache.misses(),
        "layout cache"
    );
    Ok(outputs)
}

/// Compose front and back sheets in memory, pair them by position and write
/// `"{front}&{back}.pdf"` files into `out_dir`.
///
/// Extra images on the longer side are skipped with a warning.
#[tracing::instrument(
    skip_all,
    fields(fronts = fronts.len(), backs = backs.len(), out_dir = %out_dir.display())
)]
pub fn generate_duplex(
    fronts: &[PathBuf],
    backs: &[PathBuf],
    sheet: &SheetSpec,
    settings: &Settings,
    out_dir: &Path,
) -> CardsheetResult<Vec<PathBuf>> {
    settings.validate()?;
    if fronts.len() != backs.len() {
        tracing::warn!(
            fronts = fronts.len(),
            backs = backs.len(),
            "front and back counts differ, extra images are skipped"
        );
    }
    let n = fronts.len().min(backs.len());
    let mut cache = LayoutCache::new();
    let mut compose_all = |paths: &[PathBuf]| -> CardsheetResult<Vec<Document>> {
        paths
            .iter()
            .map(|p| compose_fitting(p, sheet, settings, &mut cache).map(|(doc, _)| doc))
            .collect()
    };
    let front_docs = compose_all(&fronts[..n])?;
    let back_docs = compose_all(&backs[..n])?;

    let mut written = Vec::with_capacity(n);
    for pair in pair_documents(&front_docs, &back_docs)? {
        let path = out_dir.join(format!("{}.pdf", pair.id()));
        write_pdf(&pair, &path)?;
        written.push(path);
    }
    Ok(written)
}

// Zero placements is an error here, unlike in the pure composer.
fn compose_fitting(
    path: &Path,
    sheet: &SheetSpec,
    settings: &Settings,
    cache: &mut LayoutCache,
) -> CardsheetResult<(Document, LayoutResult)> {
    let image = Arc::new(load_image(path)?);
    let card = image.physical_size(settings.dpi);
    let layout = cache.solve(card, sheet.usable(), settings.min_spacing_mm);
    if layout.is_empty() {
        return Err(CardsheetError::invalid_input(format!(
            "image '{}' does not fit on sheet ({card} on {})",
            path.display(),
            sheet.paper
        )));
    }
    Ok((compose_sheet_with_layout(&image, sheet, &layout), layout))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
