use std::collections::HashMap;

use crate::{
    foundation::core::Dimension,
    layout::solver::{LayoutResult, solve},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct LayoutKey([u64; 5]);

impl LayoutKey {
    fn new(card: Dimension, usable: Dimension, min_spacing: f64) -> Self {
        Self([
            card.width.to_bits(),
            card.height.to_bits(),
            usable.width.to_bits(),
            usable.height.to_bits(),
            min_spacing.to_bits(),
        ])
    }
}

/// Memoised [`solve`] keyed by the exact bit pattern of its inputs.
///
/// Batch runs over many images of the same size only solve once.
#[derive(Debug, Default)]
pub struct LayoutCache {
    entries: HashMap<LayoutKey, LayoutResult>,
    hits: u64,
    misses: u64,
}

impl LayoutCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Same result as [`solve`], reusing earlier answers for identical inputs.
    pub fn solve(&mut self, card: Dimension, usable: Dimension, min_spacing: f64) -> LayoutResult {
        let key = LayoutKey::new(card, usable, min_spacing);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            return *hit;
        }
        self.misses += 1;
        let result = solve(card, usable, min_spacing);
        self.entries.insert(key, result);
        result
    }

    /// Number of distinct input tuples seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first solve.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to run the solver.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop all entries and counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/cache.rs"]
mod tests;
