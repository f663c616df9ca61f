//! Rectangle of grid cells

use serde::{Deserialize, Serialize};

/// Cell-aligned rectangle: top-left `(x, y)` column/row and `w × h` span
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridRect {
    #[inline]
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// First column past the right edge
    #[inline]
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// First row past the bottom edge
    #[inline]
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Same size at a different origin
    #[inline]
    pub fn at(self, x: u32, y: u32) -> Self {
        Self { x, y, ..self }
    }

    /// Standard axis-aligned overlap test.
    ///
    /// Two rectangles intersect unless one lies entirely to the left, right,
    /// above or below the other. Touching edges do not count.
    pub fn intersects(self, other: GridRect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// Check whether a cell is covered
    #[inline]
    pub fn contains_cell(self, col: u32, row: u32) -> bool {
        col >= self.x && col < self.right() && row >= self.y && row < self.bottom()
    }

    /// Every `(col, row)` covered, row-major
    pub fn cells(self) -> impl Iterator<Item = (u32, u32)> {
        (self.y..self.bottom()).flat_map(move |row| (self.x..self.right()).map(move |col| (col, row)))
    }

    /// Force the rectangle inside a grid of `columns` columns.
    ///
    /// Width and height are floored at 1, width is capped at `columns`,
    /// and `x` is pulled left until the right edge fits.
    pub fn clamp_to_columns(self, columns: u32) -> Self {
        let columns = columns.max(1);
        let w = self.w.clamp(1, columns);
        let h = self.h.max(1);
        let x = self.x.min(columns - w);
        Self { x, y: self.y, w, h }
    }

    /// Check the bounds invariant against a column count
    #[inline]
    pub fn fits_columns(self, columns: u32) -> bool {
        self.w >= 1 && self.h >= 1 && self.right() <= columns
    }
}
