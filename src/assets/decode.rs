use std::{path::Path, sync::Arc};

use crate::foundation::{
    core::{Dimension, px_to_mm},
    error::{CardsheetError, CardsheetResult},
    math::Fnv1a64,
};

/// File extensions accepted as card sources (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Decoded raster source split into PDF-ready planes.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Identifier used for document and output names (the file stem for loaded images).
    pub id: String,
    /// Width in pixels, never zero.
    pub width: u32,
    /// Height in pixels, never zero.
    pub height: u32,
    /// Row-major RGB8, tightly packed.
    pub rgb8: Arc<Vec<u8>>,
    /// Row-major alpha plane, present only when some pixel is not fully opaque.
    pub alpha8: Option<Arc<Vec<u8>>>,
    /// FNV-1a over dimensions and pixels; stable across runs.
    pub content_hash: u64,
}

impl SourceImage {
    /// Build from straight (non-premultiplied) RGBA8 pixels.
    pub fn from_rgba8(
        id: impl Into<String>,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> CardsheetResult<Self> {
        let id = id.into();
        if width == 0 || height == 0 {
            return Err(CardsheetError::invalid_input(format!(
                "image '{id}' has zero width or height ({width}x{height})"
            )));
        }
        let expected = (width as usize) * (height as usize) * 4;
        if rgba.len() != expected {
            return Err(CardsheetError::invalid_input(format!(
                "image '{id}' has {} bytes of RGBA data, expected {expected}",
                rgba.len()
            )));
        }

        let mut hash = Fnv1a64::new_default();
        hash.write_u64(u64::from(width));
        hash.write_u64(u64::from(height));
        hash.write_bytes(&rgba);

        let mut rgb8 = Vec::with_capacity(expected / 4 * 3);
        let mut alpha8 = Vec::with_capacity(expected / 4);
        for px in rgba.chunks_exact(4) {
            rgb8.extend_from_slice(&px[..3]);
            alpha8.push(px[3]);
        }
        let alpha8 = alpha8
            .iter()
            .any(|&a| a < u8::MAX)
            .then(|| Arc::new(alpha8));

        Ok(Self {
            id,
            width,
            height,
            rgb8: Arc::new(rgb8),
            alpha8,
            content_hash: hash.finish(),
        })
    }

    /// Physical extent when printed at `dpi`.
    pub fn physical_size(&self, dpi: f64) -> Dimension {
        Dimension::new(px_to_mm(self.width, dpi), px_to_mm(self.height, dpi))
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Decode encoded image bytes (PNG, JPEG, BMP, ...).
pub fn decode_image(id: impl Into<String>, bytes: &[u8]) -> CardsheetResult<SourceImage> {
    let id = id.into();
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CardsheetError::invalid_input(format!("decode image '{id}': {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceImage::from_rgba8(id, width, height, rgba.into_raw())
}

/// Read and decode the image at `path`; its id is the file stem.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_image(path: &Path) -> CardsheetResult<SourceImage> {
    if !path.is_file() {
        return Err(CardsheetError::not_found(format!(
            "image file '{}'",
            path.display()
        )));
    }
    let bytes = std::fs::read(path)
        .map_err(|e| CardsheetError::io(format!("read image '{}'", path.display()), e))?;
    let image = decode_image(image_id(path), &bytes)?;
    tracing::debug!(
        width = image.width,
        height = image.height,
        alpha = image.alpha8.is_some(),
        "decoded source image"
    );
    Ok(image)
}

/// File stem of `path`, used to name documents derived from it.
pub fn image_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

/// True when `path` has one of [`SUPPORTED_EXTENSIONS`].
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
