use std::{collections::BTreeMap, path::Path};

use crate::{
    config::catalog::SheetCatalog,
    foundation::{
        core::{DEFAULT_DPI, Dimension},
        error::{CardsheetError, CardsheetResult},
        fs::atomic_write,
    },
    layout::solver::{DEFAULT_MIN_SPACING_MM, SheetSpec},
};

/// Quarter inch.
pub const DEFAULT_MARGIN_MM: f64 = 6.35;

/// Explicit configuration handed to every caller of the core.
///
/// Missing keys in a settings file fall back to the defaults below.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Resolution assumed when converting image pixels to millimetres.
    pub dpi: f64,
    /// Blank border kept on every edge of the paper, in mm.
    pub margin_mm: f64,
    /// Lower bound on the gap between cards while counting, in mm.
    pub min_spacing_mm: f64,
    /// Catalog name used when the caller does not pick a sheet.
    pub default_sheet: String,
    /// Extra or overriding catalog entries.
    pub sheets: BTreeMap<String, Dimension>,
    /// Whether the image library is remembered between runs.
    pub persist_files: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            margin_mm: DEFAULT_MARGIN_MM,
            min_spacing_mm: DEFAULT_MIN_SPACING_MM,
            default_sheet: "A4".to_string(),
            sheets: BTreeMap::new(),
            persist_files: false,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> CardsheetResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| CardsheetError::io(format!("read settings '{}'", path.display()), e))?;
        let settings: Self = serde_json::from_str(&text)
            .map_err(|e| CardsheetError::serde(format!("settings '{}': {e}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings as pretty JSON, atomically.
    pub fn save(&self, path: &Path) -> CardsheetResult<()> {
        self.validate()?;
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| CardsheetError::serde(e.to_string()))?;
        atomic_write(path, text.as_bytes())
    }

    pub fn validate(&self) -> CardsheetResult<()> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(CardsheetError::invalid_input(format!(
                "dpi must be positive, got {}",
                self.dpi
            )));
        }
        if !(self.margin_mm.is_finite() && self.margin_mm >= 0.0) {
            return Err(CardsheetError::invalid_input(format!(
                "margin must be non-negative, got {}",
                self.margin_mm
            )));
        }
        if !(self.min_spacing_mm.is_finite() && self.min_spacing_mm >= 0.0) {
            return Err(CardsheetError::invalid_input(format!(
                "min spacing must be non-negative, got {}",
                self.min_spacing_mm
            )));
        }
        if let Some((name, _)) = self.sheets.iter().find(|(_, size)| !size.is_positive()) {
            return Err(CardsheetError::invalid_input(format!(
                "sheet '{name}' must have a positive size"
            )));
        }
        Ok(())
    }

    /// Built-in sizes extended by the configured `sheets`.
    pub fn catalog(&self) -> SheetCatalog {
        let mut catalog = SheetCatalog::builtin();
        for (name, size) in &self.sheets {
            catalog.insert(name.clone(), *size);
        }
        catalog
    }

    /// Resolve a catalog name (or the default sheet) with the configured margin.
    pub fn sheet(&self, name: Option<&str>) -> CardsheetResult<SheetSpec> {
        let name = name.unwrap_or(&self.default_sheet);
        let paper = self.catalog().get(name).ok_or_else(|| {
            CardsheetError::invalid_input(format!("unknown sheet size '{name}'"))
        })?;
        Ok(self.sheet_for(paper))
    }

    /// Custom paper size with the configured margin.
    pub fn sheet_for(&self, paper: Dimension) -> SheetSpec {
        SheetSpec::new(paper, self.margin_mm)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
