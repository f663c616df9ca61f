//! Input routing module
//!
//! Region hit testing, the drag/resize gesture state machine and the
//! keyboard alternate path.

mod gesture;
mod hit;
mod keyboard;
mod region;
mod result;
mod router;

pub use gesture::Gesture;
pub use hit::{hit_test, HitStyle};
pub use keyboard::{Key, KeyAction, KeyInput};
pub use region::{ResizeHandle, WidgetRegion};
pub use result::InputResult;
pub use router::GestureRouter;

use crate::math::GridRect;

/// Apply whole-cell deltas to `origin` for the given handle.
///
/// The edge opposite each moved edge stays anchored. The result is clamped
/// to the grid: `w, h >= 1`, `x >= 0`, `y >= 0` and `x + w <= columns`.
/// Nothing is relocated.
pub fn calculate_resize(
    handle: ResizeHandle,
    origin: GridRect,
    delta_cols: i32,
    delta_rows: i32,
    columns: u32,
) -> GridRect {
    let columns = i64::from(columns.max(1));
    let mut left = i64::from(origin.x);
    let mut top = i64::from(origin.y);
    let mut right = i64::from(origin.right());
    let mut bottom = i64::from(origin.bottom());
    let (dc, dr) = (i64::from(delta_cols), i64::from(delta_rows));

    if handle.moves_west() {
        left = (left + dc).max(0).min(right - 1);
    }
    if handle.moves_east() {
        right = (right + dc).min(columns).max(left + 1);
    }
    if handle.moves_north() {
        top = (top + dr).max(0).min(bottom - 1);
    }
    if handle.moves_south() {
        bottom = (bottom + dr).max(top + 1);
    }

    GridRect::new(
        to_cells(left),
        to_cells(top),
        to_cells(right - left),
        to_cells(bottom - top),
    )
}

#[inline]
fn to_cells(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
