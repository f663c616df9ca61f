//! Pixel to cell conversion

use serde::Serialize;
use crate::math::{GridRect, ScreenRect, Vec2};
use super::GridSettings;

/// Resolved pixel geometry of the grid inside its container
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMetrics {
    /// Top-left of the grid container on screen
    pub origin: Vec2,
    pub columns: u32,
    /// Width of one column in pixels, derived from the container width
    pub cell_width: f32,
    pub row_height: f32,
    pub gap: f32,
}

impl GridMetrics {
    /// Derive metrics for a container of `container_width` pixels at `origin`
    pub fn new(settings: &GridSettings, origin: Vec2, container_width: f32) -> Self {
        let columns = settings.columns.max(1);
        let gap = settings.gap as f32;
        let gutters = gap * (columns - 1) as f32;
        let cell_width = ((container_width - gutters) / columns as f32).max(1.0);

        Self {
            origin,
            columns,
            cell_width,
            row_height: settings.row_height.max(1) as f32,
            gap,
        }
    }

    /// Horizontal distance between the left edges of adjacent columns
    #[inline]
    pub fn column_pitch(&self) -> f32 {
        self.cell_width + self.gap
    }

    /// Vertical distance between the top edges of adjacent rows
    #[inline]
    pub fn row_pitch(&self) -> f32 {
        self.row_height + self.gap
    }

    /// Nearest grid cell to a screen position, clamped to ≥ 0 on both axes
    pub fn screen_to_grid(&self, screen: Vec2) -> (u32, u32) {
        let local = screen - self.origin;
        let col = (local.x / self.column_pitch()).round().max(0.0);
        let row = (local.y / self.row_pitch()).round().max(0.0);
        (col as u32, row as u32)
    }

    /// Whole-cell delta for a pixel delta, rounded to nearest
    pub fn cells_for_delta(&self, delta: Vec2) -> (i32, i32) {
        (
            (delta.x / self.column_pitch()).round() as i32,
            (delta.y / self.row_pitch()).round() as i32,
        )
    }

    /// Screen rectangle covered by a cell rectangle
    pub fn grid_to_screen(&self, rect: GridRect) -> ScreenRect {
        let x = self.origin.x + rect.x as f32 * self.column_pitch();
        let y = self.origin.y + rect.y as f32 * self.row_pitch();
        let width = rect.w as f32 * self.cell_width + rect.w.saturating_sub(1) as f32 * self.gap;
        let height = rect.h as f32 * self.row_height + rect.h.saturating_sub(1) as f32 * self.gap;
        ScreenRect::new(x, y, width, height)
    }
}

/// CSS-grid placement of a cell rectangle (1-based lines)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridArea {
    pub column_start: u32,
    pub column_span: u32,
    pub row_start: u32,
    pub row_span: u32,
}

impl From<GridRect> for GridArea {
    fn from(rect: GridRect) -> Self {
        Self {
            column_start: rect.x + 1,
            column_span: rect.w,
            row_start: rect.y + 1,
            row_span: rect.h,
        }
    }
}

impl GridArea {
    /// Value for the `grid-column` property
    pub fn grid_column(&self) -> String {
        format!("{} / span {}", self.column_start, self.column_span)
    }

    /// Value for the `grid-row` property
    pub fn grid_row(&self) -> String {
        format!("{} / span {}", self.row_start, self.row_span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 12 columns, 16px gap, 1184px wide: cell width is exactly 84px.
    fn metrics() -> GridMetrics {
        GridMetrics::new(&GridSettings::default(), Vec2::new(20.0, 40.0), 1184.0)
    }

    #[test]
    fn test_cell_width() {
        let m = metrics();
        assert!((m.cell_width - 84.0).abs() < 0.001);
        assert!((m.column_pitch() - 100.0).abs() < 0.001);
        assert!((m.row_pitch() - 96.0).abs() < 0.001);
    }

    #[test]
    fn test_screen_to_grid_rounds_to_nearest() {
        let m = metrics();
        assert_eq!(m.screen_to_grid(Vec2::new(20.0, 40.0)), (0, 0));
        assert_eq!(m.screen_to_grid(Vec2::new(20.0 + 149.0, 40.0 + 47.0)), (1, 0));
        assert_eq!(m.screen_to_grid(Vec2::new(20.0 + 151.0, 40.0 + 49.0)), (2, 1));
    }

    #[test]
    fn test_screen_to_grid_clamps_negative() {
        let m = metrics();
        assert_eq!(m.screen_to_grid(Vec2::new(-500.0, -500.0)), (0, 0));
    }

    #[test]
    fn test_grid_to_screen() {
        let r = metrics().grid_to_screen(GridRect::new(1, 2, 3, 2));
        assert!((r.x - 120.0).abs() < 0.001);
        assert!((r.y - 232.0).abs() < 0.001);
        assert!((r.width - (3.0 * 84.0 + 2.0 * 16.0)).abs() < 0.001);
        assert!((r.height - (2.0 * 80.0 + 16.0)).abs() < 0.001);
    }

    #[test]
    fn test_grid_area_css() {
        let area = GridArea::from(GridRect::new(3, 0, 2, 4));
        assert_eq!(area.grid_column(), "4 / span 2");
        assert_eq!(area.grid_row(), "1 / span 4");
    }
}
