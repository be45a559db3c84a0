use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use crate::{
    assets::decode::is_supported_image,
    config::settings::Settings,
    foundation::{
        error::{CardsheetError, CardsheetResult},
        fs::atomic_write,
    },
};

/// Ordered, de-duplicated list of source images.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageLibrary {
    images: Vec<PathBuf>,
}

impl ImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless it is already listed, missing, or not a supported image.
    ///
    /// Returns whether the library changed.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.contains(&path) {
            return false;
        }
        if !path.is_file() || !is_supported_image(&path) {
            tracing::warn!(path = %path.display(), "skipping file that is not a readable image");
            return false;
        }
        self.images.push(path);
        true
    }

    /// [`add`](Self::add) each path; returns how many were accepted.
    pub fn add_all<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths
            .into_iter()
            .map(|p| self.add(p))
            .filter(|&added| added)
            .count()
    }

    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.images.len();
        self.images.retain(|p| p != path);
        self.images.len() != before
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.images.iter().any(|p| p == path)
    }

    /// Images in insertion order.
    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Restore a list saved with [`save_persisted`](Self::save_persisted).
    ///
    /// Yields an empty library when persistence is off or nothing was saved yet. Entries whose
    /// files have since disappeared are dropped.
    pub fn load_persisted(path: &Path, settings: &Settings) -> CardsheetResult<Self> {
        let mut library = Self::new();
        if !settings.persist_files || !path.exists() {
            return Ok(library);
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| CardsheetError::io(format!("read '{}'", path.display()), e))?;
        let saved: Vec<PathBuf> = serde_json::from_str(&text)
            .map_err(|e| CardsheetError::serde(format!("image list '{}': {e}", path.display())))?;
        let restored = library.add_all(saved);
        tracing::debug!(restored, "restored image library");
        Ok(library)
    }

    /// Store the list as a JSON array of paths when persistence is on.
    ///
    /// Returns whether a file was written.
    pub fn save_persisted(&self, path: &Path, settings: &Settings) -> CardsheetResult<bool> {
        if !settings.persist_files {
            return Ok(false);
        }
        let text = serde_json::to_string_pretty(&self.images)
            .map_err(|e| CardsheetError::serde(e.to_string()))?;
        atomic_write(path, text.as_bytes())?;
        Ok(true)
    }
}

/// Front/back membership over an [`ImageLibrary`].
///
/// An image may be both a front and a back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    front: HashSet<PathBuf>,
    back: HashSet<PathBuf>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_front(&mut self, path: &Path, selected: bool) {
        toggle(&mut self.front, path, selected);
    }

    pub fn set_back(&mut self, path: &Path, selected: bool) {
        toggle(&mut self.back, path, selected);
    }

    /// Mark every library image as a front, or clear all fronts.
    pub fn select_all_front(&mut self, library: &ImageLibrary, selected: bool) {
        self.front.clear();
        if selected {
            self.front.extend(library.images().iter().cloned());
        }
    }

    /// Mark every library image as a back, or clear all backs.
    pub fn select_all_back(&mut self, library: &ImageLibrary, selected: bool) {
        self.back.clear();
        if selected {
            self.back.extend(library.images().iter().cloned());
        }
    }

    pub fn is_front(&self, path: &Path) -> bool {
        self.front.contains(path)
    }

    pub fn is_back(&self, path: &Path) -> bool {
        self.back.contains(path)
    }

    /// Selected fronts in library order.
    pub fn fronts(&self, library: &ImageLibrary) -> Vec<PathBuf> {
        in_library_order(library, &self.front)
    }

    /// Selected backs in library order.
    pub fn backs(&self, library: &ImageLibrary) -> Vec<PathBuf> {
        in_library_order(library, &self.back)
    }

    pub fn clear(&mut self) {
        self.front.clear();
        self.back.clear();
    }
}

fn toggle(set: &mut HashSet<PathBuf>, path: &Path, selected: bool) {
    if selected {
        set.insert(path.to_path_buf());
    } else {
        set.remove(path);
    }
}

fn in_library_order(library: &ImageLibrary, set: &HashSet<PathBuf>) -> Vec<PathBuf> {
    library
        .images()
        .iter()
        .filter(|p| set.contains(*p))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/selection/library.rs"]
mod tests;
