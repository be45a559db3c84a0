use crate::foundation::core::Dimension;

/// Minimum gap between cards used while counting placements.
pub const DEFAULT_MIN_SPACING_MM: f64 = 1.0;

/// Largest grid the solver reports, per axis and in total. Fits beyond it count as nothing fits.
pub const MAX_PLACEMENTS: u32 = 10_000;

/// Physical paper plus the blank margin kept on every edge.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SheetSpec {
    /// Full paper size in mm.
    pub paper: Dimension,
    /// Margin in mm, applied on all four sides.
    pub margin: f64,
}

impl SheetSpec {
    /// Build a sheet from its paper size and margin.
    pub fn new(paper: Dimension, margin: f64) -> Self {
        Self { paper, margin }
    }

    /// Paper minus the margin on each side. May be zero or negative for degenerate sheets.
    pub fn usable(&self) -> Dimension {
        self.paper.inset(self.margin)
    }
}

/// Grid placement chosen by [`solve`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutResult {
    /// Number of cards on the sheet; always `columns * rows`.
    pub total: u32,
    /// Cards per row.
    pub columns: u32,
    /// Cards per column.
    pub rows: u32,
    /// Card width as placed (already swapped when `rotated`).
    pub card_width: f64,
    /// Card height as placed (already swapped when `rotated`).
    pub card_height: f64,
    /// Even horizontal gap, counted `columns + 1` times across the usable width.
    pub x_spacing: f64,
    /// Even vertical gap, counted `rows + 1` times across the usable height.
    pub y_spacing: f64,
    /// Whether the card was turned by 90 degrees.
    pub rotated: bool,
}

impl LayoutResult {
    /// Card extent as placed on the sheet.
    pub fn card(&self) -> Dimension {
        Dimension::new(self.card_width, self.card_height)
    }

    /// True when nothing fits.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Extent of the card block without the outer gaps: `cells * card + (cells - 1) * spacing`.
    pub fn occupied(&self) -> Dimension {
        Dimension::new(
            occupied_extent(self.columns, self.card_width, self.x_spacing),
            occupied_extent(self.rows, self.card_height, self.y_spacing),
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct GridFit {
    columns: u32,
    rows: u32,
}

impl GridFit {
    // Bounded by `MAX_PLACEMENTS` in `grid_fit`, so the product cannot overflow.
    fn count(self) -> u32 {
        self.columns * self.rows
    }
}

/// Orientation rule shared by counting and rendering.
///
/// The rotated card wins with a strictly larger fit. On an exact tie it wins only when the given
/// card is taller than it is wide.
pub fn choose_orientation(card: Dimension, standard_fit: u32, rotated_fit: u32) -> bool {
    rotated_fit > standard_fit || (rotated_fit == standard_fit && card.height > card.width)
}

/// Pack as many `card`s as possible into `usable`, trying both orientations.
///
/// `min_spacing` only bounds the count; the reported spacing spreads the leftover space evenly
/// over `cells + 1` gaps per axis. Non-positive or non-finite inputs produce an empty layout, and
/// so does a grid larger than [`MAX_PLACEMENTS`].
pub fn solve(card: Dimension, usable: Dimension, min_spacing: f64) -> LayoutResult {
    let spacing = if min_spacing.is_finite() && min_spacing > 0.0 {
        min_spacing
    } else {
        0.0
    };

    let standard = grid_fit(card, usable, spacing);
    let turned = grid_fit(card.swapped(), usable, spacing);
    let rotated = choose_orientation(card, standard.count(), turned.count());
    let (fit, placed) = if rotated {
        (turned, card.swapped())
    } else {
        (standard, card)
    };

    let total = fit.count();
    let (x_spacing, y_spacing) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            even_gap(usable.width, fit.columns, placed.width),
            even_gap(usable.height, fit.rows, placed.height),
        )
    };

    tracing::debug!(
        standard = standard.count(),
        rotated_fit = turned.count(),
        rotated,
        columns = fit.columns,
        rows = fit.rows,
        "solved sheet layout"
    );

    LayoutResult {
        total,
        columns: fit.columns,
        rows: fit.rows,
        card_width: placed.width,
        card_height: placed.height,
        x_spacing,
        y_spacing,
        rotated,
    }
}

/// [`solve`] against a full paper size, subtracting `margin` from every edge first.
pub fn calculate(card: Dimension, paper: Dimension, margin: f64, min_spacing: f64) -> LayoutResult {
    solve(card, SheetSpec::new(paper, margin).usable(), min_spacing)
}

fn grid_fit(card: Dimension, usable: Dimension, spacing: f64) -> GridFit {
    let columns = cells_along(usable.width, card.width, spacing);
    let rows = cells_along(usable.height, card.height, spacing);
    let limit = u64::from(MAX_PLACEMENTS);
    let count = u64::from(columns) * u64::from(rows);
    if u64::from(columns) > limit || u64::from(rows) > limit || count > limit {
        tracing::warn!(columns, rows, limit, "grid exceeds placement limit, treating as empty");
        return GridFit::default();
    }
    GridFit { columns, rows }
}

// N cards need N * card + (N - 1) * spacing <= usable.
fn cells_along(usable: f64, card: f64, spacing: f64) -> u32 {
    if !(usable.is_finite() && card.is_finite()) || usable <= 0.0 || card <= 0.0 {
        return 0;
    }
    ((usable + spacing) / (card + spacing)).floor().max(0.0) as u32
}

fn even_gap(usable: f64, cells: u32, card: f64) -> f64 {
    let cells = f64::from(cells);
    ((usable - cells * card) / (cells + 1.0)).max(0.0)
}

fn occupied_extent(cells: u32, card: f64, spacing: f64) -> f64 {
    if cells == 0 {
        return 0.0;
    }
    let cells = f64::from(cells);
    cells * card + (cells - 1.0) * spacing
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
