//! Pointer gesture state

use crate::math::{GridRect, Vec2};
use crate::state::WidgetId;
use super::ResizeHandle;

/// In-flight pointer gesture
///
/// `candidate` is the last validated footprint. It is what the preview
/// shows and what pointer-up commits.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
    /// Moving a widget by its header
    Drag {
        widget_id: WidgetId,
        /// Footprint at gesture start
        origin: GridRect,
        /// Offset from the container's top-left to the pointer
        grab_offset: Vec2,
        candidate: GridRect,
    },
    /// Resizing a widget from one handle
    Resize {
        widget_id: WidgetId,
        handle: ResizeHandle,
        origin: GridRect,
        /// Pointer position at start (screen coords)
        start_pointer: Vec2,
        candidate: GridRect,
    },
}

impl Gesture {
    #[inline]
    pub fn is_drag(&self) -> bool {
        matches!(self, Gesture::Drag { .. })
    }

    #[inline]
    pub fn is_resize(&self) -> bool {
        matches!(self, Gesture::Resize { .. })
    }

    pub fn widget_id(&self) -> &str {
        match self {
            Gesture::Drag { widget_id, .. } | Gesture::Resize { widget_id, .. } => widget_id,
        }
    }

    pub fn origin(&self) -> GridRect {
        match self {
            Gesture::Drag { origin, .. } | Gesture::Resize { origin, .. } => *origin,
        }
    }

    pub fn candidate(&self) -> GridRect {
        match self {
            Gesture::Drag { candidate, .. } | Gesture::Resize { candidate, .. } => *candidate,
        }
    }

    pub fn set_candidate(&mut self, rect: GridRect) {
        match self {
            Gesture::Drag { candidate, .. } | Gesture::Resize { candidate, .. } => *candidate = rect,
        }
    }

    /// Whether committing would change anything
    #[inline]
    pub fn has_changed(&self) -> bool {
        self.candidate() != self.origin()
    }
}
