//! Gesture state machine
//!
//! At most one gesture is active for the whole engine: `Idle -> Dragging
//! -> Idle` or `Idle -> Resizing -> Idle`.

use crate::math::{GridRect, Vec2};
use crate::state::WidgetId;
use super::{Gesture, ResizeHandle};

/// Input router holding the active gesture
#[derive(Clone, Debug, Default)]
pub struct GestureRouter {
    gesture: Option<Gesture>,
}

impl GestureRouter {
    pub fn new() -> Self {
        Self { gesture: None }
    }

    #[inline]
    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    #[inline]
    pub fn gesture_mut(&mut self) -> Option<&mut Gesture> {
        self.gesture.as_mut()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Enter the dragging state; `false` if a gesture is already running
    pub fn start_drag(&mut self, widget_id: WidgetId, origin: GridRect, grab_offset: Vec2) -> bool {
        if self.is_active() {
            return false;
        }
        self.gesture = Some(Gesture::Drag {
            widget_id,
            origin,
            grab_offset,
            candidate: origin,
        });
        true
    }

    /// Enter the resizing state; `false` if a gesture is already running
    pub fn start_resize(
        &mut self,
        widget_id: WidgetId,
        handle: ResizeHandle,
        origin: GridRect,
        start_pointer: Vec2,
    ) -> bool {
        if self.is_active() {
            return false;
        }
        self.gesture = Some(Gesture::Resize {
            widget_id,
            handle,
            origin,
            start_pointer,
            candidate: origin,
        });
        true
    }

    /// Return to idle, yielding the finished gesture
    pub fn finish(&mut self) -> Option<Gesture> {
        self.gesture.take()
    }
}
