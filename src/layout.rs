//! # Sheet Layout
//!
//! Computes how many whole label footprints fit on a sheet, and where each
//! one goes.
//!
//! ## Grid Geometry
//!
//! ```text
//! ├ margin ┼── footprint ──┼ gap ┼── footprint ──┼ gap ┼ ... ┼ margin ┤
//!           label + 2·bleed                                   paper.width
//! ```
//!
//! Fitting is computed in the configured unit, before any pixel conversion:
//!
//! ```text
//! available = paper.width − 2·margin
//! cols      = floor((available + gap) / (footprint + gap))
//! ```
//!
//! The trailing gap after the last column is not needed, which is why it is
//! added back to `available`. This guarantees
//! `cols·(footprint + gap) − gap ≤ available`, and a row that fills the
//! available width exactly still counts every label in it.

use crate::config::LabelConfig;

/// Slack for floating-point error when a row fills the sheet exactly.
const FIT_EPSILON: f64 = 1e-9;

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether two rectangles share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Number of label columns and rows that fit on one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetLayout {
    pub cols: u32,
    pub rows: u32,
}

impl SheetLayout {
    /// Compute the grid for a configuration.
    ///
    /// A sheet too small for a single footprint in either direction yields
    /// `(0, 0)`. That is a valid layout with zero capacity, not an error.
    ///
    /// ## Example
    ///
    /// ```
    /// use labelkit::config::LabelConfig;
    /// use labelkit::layout::SheetLayout;
    ///
    /// let layout = SheetLayout::calculate(&LabelConfig::a4());
    /// assert_eq!((layout.cols, layout.rows), (3, 8));
    /// ```
    pub fn calculate(config: &LabelConfig) -> Self {
        let paper = &config.paper;
        let cols = fit_count(
            paper.width - 2.0 * paper.margin,
            config.footprint_width(),
            paper.gap,
        );
        let rows = fit_count(
            paper.height - 2.0 * paper.margin,
            config.footprint_height(),
            paper.gap,
        );

        if cols == 0 || rows == 0 {
            return Self::default();
        }
        Self { cols, rows }
    }

    /// Total number of labels one sheet holds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Grid cell `(col, row)` for a label index, row-major.
    pub fn cell(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.capacity() {
            return None;
        }
        let cols = self.cols as usize;
        Some(((index % cols) as u32, (index / cols) as u32))
    }

    /// Pixel rectangle occupied by the label at `index`.
    ///
    /// The origin is converted from its physical position in one step and the
    /// size is the label canvas, so a pasted label is never cut short:
    ///
    /// ```text
    /// x     = px(margin + col·(footprint + gap))
    /// width = px(footprint)
    /// ```
    ///
    /// A gap of at least one pixel keeps neighbours apart at any DPI. With a
    /// smaller gap, rounding may let adjacent cells share their edge pixel;
    /// labels are pasted in index order, so the later label wins there.
    pub fn placement(&self, config: &LabelConfig, index: usize) -> Option<Rect> {
        let (col, row) = self.cell(index)?;
        let scale = config.scale();
        let paper = &config.paper;

        let step_x = config.footprint_width() + paper.gap;
        let step_y = config.footprint_height() + paper.gap;

        let x = scale.px(paper.margin + col as f64 * step_x);
        let y = scale.px(paper.margin + row as f64 * step_y);
        let width = scale.px(config.footprint_width());
        let height = scale.px(config.footprint_height());

        Some(Rect::new(x, y, width, height))
    }

    /// Placement rectangles for every cell, in index order.
    pub fn placements(&self, config: &LabelConfig) -> Vec<Rect> {
        (0..self.capacity())
            .filter_map(|i| self.placement(config, i))
            .collect()
    }
}

/// How many `item`s separated by `gap` fit into `available`.
fn fit_count(available: f64, item: f64, gap: f64) -> u32 {
    if available <= 0.0 || item <= 0.0 {
        return 0;
    }
    let count = ((available + gap) / (item + gap) + FIT_EPSILON).floor();
    if count.is_finite() && count > 0.0 {
        count.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

// ============================================================================
// TESTS
// ============================================================================
