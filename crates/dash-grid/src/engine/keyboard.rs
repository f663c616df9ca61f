//! Keyboard path for the focused widget
//!
//! Moves and resizes are checked inline and committed at once, with no
//! preview. A step that would leave the grid, shrink below one cell or land
//! on another widget is refused.

use tracing::debug;

use crate::input::{InputResult, KeyAction, KeyInput};
use crate::math::GridRect;
use super::GridEngine;

impl GridEngine {
    /// Handle a key press; `Unhandled` when nothing has focus or the key
    /// means nothing to the grid
    pub fn handle_key(&mut self, input: &KeyInput) -> InputResult {
        let Some(widget_id) = self.focused() else {
            return InputResult::Unhandled;
        };
        let Some(action) = input.action() else {
            return InputResult::Unhandled;
        };
        let Some(record) = self.state.get_widget(&widget_id) else {
            return InputResult::Unhandled;
        };

        let columns = self.state.with_state(|s| s.grid.columns);
        let current = record.rect();

        match action {
            KeyAction::Move { dx, dy } => {
                let moved = step(current.x, dx)
                    .zip(step(current.y, dy))
                    .map(|(x, y)| current.at(x, y));
                match moved.filter(|r| r.fits_columns(columns) && self.is_clear(&widget_id, *r)) {
                    Some(r) => {
                        self.state.move_widget(&widget_id, r.x, r.y);
                    }
                    None => debug!(widget_id = %widget_id, "keyboard move blocked"),
                }
            }
            KeyAction::Resize { dw, dh } => {
                let resized = step(current.w, dw)
                    .zip(step(current.h, dh))
                    .filter(|(w, h)| *w >= 1 && *h >= 1)
                    .map(|(w, h)| GridRect::new(current.x, current.y, w, h));
                match resized.filter(|r| r.fits_columns(columns) && self.is_clear(&widget_id, *r)) {
                    Some(r) => {
                        self.state.resize_widget(&widget_id, r.w, r.h);
                    }
                    None => debug!(widget_id = %widget_id, "keyboard resize blocked"),
                }
            }
            KeyAction::Remove => {
                self.state.remove_widget(&widget_id);
            }
        }
        InputResult::Handled
    }

    fn is_clear(&self, widget_id: &str, rect: GridRect) -> bool {
        self.state
            .with_state(|s| s.rects_except(widget_id))
            .iter()
            .all(|other| !other.intersects(rect))
    }
}

#[inline]
fn step(value: u32, delta: i32) -> Option<u32> {
    value.checked_add_signed(delta)
}
