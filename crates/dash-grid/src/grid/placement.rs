//! Placement algorithms
//!
//! Both are deliberately greedy: the empty-position search is first-fit in
//! row-major order and the collision resolver only pushes a candidate down.

use crate::math::GridRect;

/// First free `(x, y)` for a `w × h` rectangle.
///
/// Scans rows from 0 and columns from 0 to `columns - w`, returning the
/// first origin whose whole rectangle covers no occupied cell. If no slot exists within `max_rows`, the widget goes at column 0
/// below the lowest occupied row.
pub fn find_empty_position(
    occupied: impl IntoIterator<Item = GridRect>,
    columns: u32,
    w: u32,
    h: u32,
    max_rows: u32,
) -> (u32, u32) {
    let columns = columns.max(1);
    let w = w.clamp(1, columns);
    let h = h.max(1);

    let occupied: Vec<GridRect> = occupied.into_iter().collect();
    let lowest = occupied.iter().map(|r| r.bottom()).max().unwrap_or(0);

    for y in 0..max_rows {
        for x in 0..=(columns - w) {
            let candidate = GridRect::new(x, y, w, h);
            if !occupied.iter().any(|rect| rect.intersects(candidate)) {
                return (x, y);
            }
        }
    }

    (0, lowest)
}

/// Outcome of [`resolve_collision`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Position to preview or commit
    pub rect: GridRect,
    /// Rows pushed down
    pub attempts: u32,
    /// `false` when the attempt budget ran out with an overlap remaining
    pub converged: bool,
}

/// Clamp a candidate into the grid and push it down until it is clear.
///
/// `x` is clamped into `[0, columns - w]`. While the candidate intersects
/// any rectangle in `others`, `y` is incremented. After `max_attempts`
/// increments the last candidate is accepted even if it still overlaps.
pub fn resolve_collision(
    candidate: GridRect,
    others: &[GridRect],
    columns: u32,
    max_attempts: u32,
) -> Resolution {
    let mut rect = candidate.clamp_to_columns(columns);
    let mut attempts = 0;

    while others.iter().any(|other| other.intersects(rect)) {
        if attempts >= max_attempts {
            return Resolution { rect, attempts, converged: false };
        }
        rect.y = rect.y.saturating_add(1);
        attempts += 1;
    }

    Resolution { rect, attempts, converged: true }
}

/// Pull every rectangle inside `columns` and push overlaps down.
///
/// Rectangles are settled top to bottom (then left to right), each one
/// against those already settled. The result keeps the input order.
pub fn fit_to_columns(rects: &[GridRect], columns: u32, max_attempts: u32) -> Vec<GridRect> {
    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by_key(|&i| (rects[i].y, rects[i].x));

    let mut settled = Vec::with_capacity(rects.len());
    let mut fitted = rects.to_vec();
    for i in order {
        let rect = resolve_collision(rects[i], &settled, columns, max_attempts).rect;
        settled.push(rect);
        fitted[i] = rect;
    }
    fitted
}
