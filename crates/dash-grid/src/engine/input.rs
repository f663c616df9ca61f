//! Pointer handling for drag and resize gestures

use tracing::{debug, info, warn};

use crate::grid::resolve_collision;
use crate::input::{calculate_resize, hit_test, Gesture, InputResult, ResizeHandle, WidgetRegion};
use crate::math::{GridRect, Vec2};
use crate::state::WidgetUpdate;
use super::{ContainerAction, GridEngine, GridEvent};

impl GridEngine {
    /// Handle pointer down at screen coordinates
    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> InputResult {
        if self.router.is_active() {
            return InputResult::Unhandled;
        }
        let pos = Vec2::new(x, y);

        let hit = {
            let tree = self.tree.borrow();
            tree.container_at(pos).and_then(|(container, rect)| {
                let region = hit_test(rect, pos, &self.hit_style)?;
                Some((container.widget_id().to_string(), container.is_minimized(), rect.position(), region))
            })
        };
        let Some((widget_id, minimized, top_left, region)) = hit else {
            return InputResult::Unhandled;
        };

        self.tree.borrow_mut().set_focus(Some(widget_id.clone()));

        // A minimized container only shows its header
        let region = match region {
            WidgetRegion::Content | WidgetRegion::Resize(_) if minimized => WidgetRegion::DragHandle,
            region => region,
        };

        match region {
            WidgetRegion::MinimizeButton => {
                self.trigger_action(&widget_id, ContainerAction::Minimize);
                InputResult::Handled
            }
            WidgetRegion::SettingsButton => {
                self.trigger_action(&widget_id, ContainerAction::OpenSettings);
                InputResult::Handled
            }
            WidgetRegion::DragHandle => self.start_drag(widget_id, pos - top_left),
            WidgetRegion::Resize(handle) => self.start_resize(widget_id, handle, pos),
            WidgetRegion::Content => {
                let local = pos - top_left;
                InputResult::Forward {
                    widget_id,
                    local_x: local.x,
                    local_y: local.y,
                }
            }
        }
    }

    fn start_drag(&mut self, widget_id: String, grab_offset: Vec2) -> InputResult {
        let Some(origin) = self.state.get_widget(&widget_id).map(|w| w.rect()) else {
            return InputResult::Unhandled;
        };
        if self.router.start_drag(widget_id.clone(), origin, grab_offset) {
            debug!(widget_id = %widget_id, "drag started");
            self.emit(GridEvent::DragStart { widget_id, origin });
        }
        InputResult::Handled
    }

    fn start_resize(&mut self, widget_id: String, handle: ResizeHandle, pointer: Vec2) -> InputResult {
        let Some(origin) = self.state.get_widget(&widget_id).map(|w| w.rect()) else {
            return InputResult::Unhandled;
        };
        if self.router.start_resize(widget_id.clone(), handle, origin, pointer) {
            debug!(widget_id = %widget_id, ?handle, "resize started");
            self.emit(GridEvent::ResizeStart { widget_id, handle, origin });
        }
        InputResult::Handled
    }

    /// Handle pointer move; updates the preview of the active gesture
    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> InputResult {
        let Some(gesture) = self.router.gesture() else {
            return InputResult::Unhandled;
        };
        let pos = Vec2::new(x, y);
        let metrics = self.metrics();
        let others = self.state.with_state(|s| s.rects_except(gesture.widget_id()));

        let next = match gesture {
            Gesture::Drag { widget_id, origin, grab_offset, .. } => {
                let (col, row) = metrics.screen_to_grid(pos - *grab_offset);
                let resolution = resolve_collision(
                    origin.at(col, row),
                    &others,
                    metrics.columns,
                    self.max_collision_attempts,
                );
                if !resolution.converged {
                    warn!(widget_id = %widget_id, attempts = resolution.attempts, "collision budget exhausted");
                }
                Some(resolution.rect)
            }
            Gesture::Resize { handle, origin, start_pointer, .. } => {
                let (dc, dr) = metrics.cells_for_delta(pos - *start_pointer);
                let rect = calculate_resize(*handle, *origin, dc, dr, metrics.columns);
                // Overlapping candidates are refused; the preview holds
                (!overlaps(rect, &others)).then_some(rect)
            }
        };

        if let (Some(rect), Some(gesture)) = (next, self.router.gesture_mut()) {
            gesture.set_candidate(rect);
        }
        InputResult::Handled
    }

    /// Handle pointer up; commits the last validated candidate
    pub fn handle_pointer_up(&mut self) -> InputResult {
        let Some(gesture) = self.router.finish() else {
            return InputResult::Unhandled;
        };
        let rect = gesture.candidate();
        let changed = gesture.has_changed();

        match gesture {
            Gesture::Drag { widget_id, .. } => {
                let committed = changed && self.state.move_widget(&widget_id, rect.x, rect.y);
                if committed {
                    info!(widget_id = %widget_id, x = rect.x, y = rect.y, "drag committed");
                }
                self.emit(GridEvent::DragEnd { widget_id, rect, committed });
            }
            Gesture::Resize { widget_id, .. } => {
                let committed = changed && self.state.update_widget(&widget_id, WidgetUpdate::rect(rect));
                if committed {
                    info!(widget_id = %widget_id, w = rect.w, h = rect.h, "resize committed");
                }
                self.emit(GridEvent::ResizeEnd { widget_id, rect, committed });
            }
        }
        InputResult::Handled
    }
}

fn overlaps(rect: GridRect, others: &[GridRect]) -> bool {
    others.iter().any(|other| other.intersects(rect))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::super::tests::{add, rig};
    use super::*;
    use crate::state::StateEventKind;

    // Header band of a widget at cell (col, row): 10px right, 20px down
    fn header(col: u32, row: u32) -> (f32, f32) {
        (col as f32 * 100.0 + 10.0, row as f32 * 96.0 + 20.0)
    }

    #[test]
    fn test_drag_commits_without_push_down() {
        let mut rig = rig();
        let a = add(&rig, "clock", 0, 0, 3, 2);
        add(&rig, "clock", 4, 0, 3, 2);

        let (x, y) = header(0, 0);
        assert_eq!(rig.engine.handle_pointer_down(x, y), InputResult::Handled);
        rig.engine.handle_pointer_move(x + 100.0, y);
        assert_eq!(rig.engine.preview().unwrap().rect, GridRect::new(1, 0, 3, 2));
        rig.engine.handle_pointer_up();

        let record = rig.engine.state().get_widget(&a).unwrap();
        assert_eq!((record.x, record.y), (1, 0));
        assert_eq!(
            rig.events.borrow().last(),
            Some(&GridEvent::DragEnd { widget_id: a, rect: GridRect::new(1, 0, 3, 2), committed: true })
        );
    }

    #[test]
    fn test_drag_one_column_into_neighbour_pushes_down() {
        let mut rig = rig();
        let a = add(&rig, "clock", 0, 0, 3, 2);
        add(&rig, "clock", 3, 0, 3, 2);

        let (x, y) = header(0, 0);
        rig.engine.handle_pointer_down(x, y);
        rig.engine.handle_pointer_move(x + 100.0, y);
        rig.engine.handle_pointer_up();

        let record = rig.engine.state().get_widget(&a).unwrap();
        assert_eq!((record.x, record.y), (1, 2));
    }

    #[test]
    fn test_drag_onto_occupied_row_pushes_down() {
        let mut rig = rig();
        let a = add(&rig, "clock", 0, 4, 3, 2);
        add(&rig, "quotes", 0, 0, 12, 2);

        let (x, y) = header(0, 4);
        rig.engine.handle_pointer_down(x, y);
        rig.engine.handle_pointer_move(x + 300.0, y - 4.0 * 96.0);
        assert_eq!(rig.engine.preview().unwrap().rect, GridRect::new(3, 2, 3, 2));
        rig.engine.handle_pointer_up();

        let record = rig.engine.state().get_widget(&a).unwrap();
        assert_eq!((record.x, record.y), (3, 2));
    }

    #[test]
    fn test_drag_clamps_to_right_edge() {
        let mut rig = rig();
        let a = add(&rig, "clock", 0, 0, 3, 2);
        let (x, y) = header(0, 0);
        rig.engine.handle_pointer_down(x, y);
        rig.engine.handle_pointer_move(x + 5000.0, y - 500.0);
        rig.engine.handle_pointer_up();
        let record = rig.engine.state().get_widget(&a).unwrap();
        assert_eq!((record.x, record.y), (9, 0));
    }

    #[test]
    fn test_drag_with_no_net_move_does_not_commit() {
        let mut rig = rig();
        let a = add(&rig, "clock", 0, 0, 3, 2);
        let updates = Rc::new(Cell::new(0));
        let u = Rc::clone(&updates);
        let _ = rig
            .engine
            .state()
            .subscribe(StateEventKind::WidgetUpdated, move |_| u.set(u.get() + 1));

        let (x, y) = header(0, 0);
        rig.engine.handle_pointer_down(x, y);
        rig.engine.handle_pointer_move(x + 20.0, y + 10.0);
        rig.engine.handle_pointer_up();

        assert_eq!(updates.get(), 0);
        assert!(matches!(
            rig.events.borrow().last(),
            Some(GridEvent::DragEnd { committed: false, .. })
        ));
        assert_eq!(rig.engine.state().get_widget(&a).unwrap().rect(), GridRect::new(0, 0, 3, 2));
    }

    #[test]
    fn test_state_untouched_until_pointer_up() {
        let mut rig = rig();
        let a = add(&rig, "clock", 0, 0, 3, 2);
        let (x, y) = header(0, 0);
        rig.engine.handle_pointer_down(x, y);
        rig.engine.handle_pointer_move(x + 400.0, y);
        assert_eq!(rig.engine.state().get_widget(&a).unwrap().x, 0);
        assert!(rig.engine.is_interacting());
    }

    #[test]
    fn test_resize_from_south_east_corner() {
        let mut rig = rig();
        let a = add(&rig, "notes", 0, 0, 3, 2);
        // SE corner of a 284x176 box
        rig.engine.handle_pointer_down(282.0, 174.0);
        assert!(matches!(
            rig.events.borrow().last(),
            Some(GridEvent::ResizeStart { handle: ResizeHandle::SE, .. })
        ));
        rig.engine.handle_pointer_move(282.0 + 200.0, 174.0 + 96.0);
        rig.engine.handle_pointer_up();

        assert_eq!(rig.engine.state().get_widget(&a).unwrap().rect(), GridRect::new(0, 0, 5, 3));
    }

    #[test]
    fn test_resize_refuses_overlap() {
        let mut rig = rig();
        let a = add(&rig, "notes", 0, 0, 3, 2);
        add(&rig, "todo", 5, 0, 3, 2);

        rig.engine.handle_pointer_down(282.0, 100.0);
        rig.engine.handle_pointer_move(382.0, 100.0);
        assert_eq!(rig.engine.preview().unwrap().rect, GridRect::new(0, 0, 4, 2));
        // one more column would overlap the neighbour; preview holds
        rig.engine.handle_pointer_move(582.0, 100.0);
        assert_eq!(rig.engine.preview().unwrap().rect, GridRect::new(0, 0, 4, 2));
        rig.engine.handle_pointer_up();

        assert_eq!(rig.engine.state().get_widget(&a).unwrap().w, 4);
    }

    #[test]
    fn test_content_forwards_local_coordinates() {
        let mut rig = rig();
        let a = add(&rig, "notes", 2, 1, 3, 2);
        let result = rig.engine.handle_pointer_down(250.0, 150.0);
        assert_eq!(
            result,
            InputResult::Forward { widget_id: a.clone(), local_x: 50.0, local_y: 54.0 }
        );
        assert_eq!(rig.engine.focused(), Some(a));
        assert!(!rig.engine.is_interacting());
    }

    #[test]
    fn test_minimize_button() {
        let mut rig = rig();
        let a = add(&rig, "notes", 0, 0, 3, 2);
        assert_eq!(rig.engine.handle_pointer_down(230.0, 12.0), InputResult::Handled);
        assert!(rig.engine.state().get_widget(&a).unwrap().minimized);
        assert!(!rig.engine.is_interacting());
    }

    #[test]
    fn test_second_pointer_down_ignored_during_gesture() {
        let mut rig = rig();
        add(&rig, "clock", 0, 0, 3, 2);
        add(&rig, "clock", 3, 0, 3, 2);
        let (x, y) = header(0, 0);
        rig.engine.handle_pointer_down(x, y);
        let (x2, y2) = header(3, 0);
        assert_eq!(rig.engine.handle_pointer_down(x2, y2), InputResult::Unhandled);
        assert_eq!(rig.engine.preview().unwrap().widget_id, "clock-1");
    }

    #[test]
    fn test_idle_pointer_events_unhandled() {
        let mut rig = rig();
        assert_eq!(rig.engine.handle_pointer_move(10.0, 10.0), InputResult::Unhandled);
        assert_eq!(rig.engine.handle_pointer_up(), InputResult::Unhandled);
        assert_eq!(rig.engine.handle_pointer_down(10.0, 10.0), InputResult::Unhandled);
    }

    #[test]
    fn test_widget_removed_mid_drag() {
        let mut rig = rig();
        let a = add(&rig, "clock", 0, 0, 3, 2);
        let (x, y) = header(0, 0);
        rig.engine.handle_pointer_down(x, y);
        rig.engine.handle_pointer_move(x + 300.0, y);
        rig.engine.state().remove_widget(&a);
        rig.engine.handle_pointer_up();

        assert!(matches!(
            rig.events.borrow().last(),
            Some(GridEvent::DragEnd { committed: false, .. })
        ));
        assert!(rig.engine.state().get_state().widgets.is_empty());
    }
}
