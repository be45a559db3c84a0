use crate::foundation::core::Dimension;

const BUILTIN_SHEETS: [(&str, f64, f64); 9] = [
    ("A3", 297.0, 420.0),
    ("A4", 210.0, 297.0),
    ("A5", 148.0, 210.0),
    ("A6", 105.0, 148.0),
    ("Letter", 215.9, 279.4),
    ("Legal", 215.9, 355.6),
    ("Tabloid", 279.4, 431.8),
    ("4x6", 101.6, 152.4),
    ("5x7", 127.0, 177.8),
];

/// Ordered mapping from a human-readable paper name to its size in mm.
///
/// Names compare case-insensitively; the spelling of the first insertion is kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetCatalog {
    entries: Vec<(String, Dimension)>,
}

impl SheetCatalog {
    /// Catalog without any entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// ISO A-series, US sizes and common photo papers.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for (name, w, h) in BUILTIN_SHEETS {
            catalog.insert(name, Dimension::new(w, h));
        }
        catalog
    }

    /// Add `name`, replacing the size of an existing entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, size: Dimension) {
        let name = name.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some((_, existing)) => *existing = size,
            None => self.entries.push((name, size)),
        }
    }

    /// Size registered under `name`.
    pub fn get(&self, name: &str) -> Option<Dimension> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, size)| *size)
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, size)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Dimension)> {
        self.entries.iter().map(|(name, size)| (name.as_str(), *size))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/catalog.rs"]
mod tests;
