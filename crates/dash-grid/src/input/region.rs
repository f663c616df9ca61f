//! Widget container regions for hit testing

use serde::{Deserialize, Serialize};

/// One of the eight resize hotspots
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
        ResizeHandle::NE,
        ResizeHandle::NW,
        ResizeHandle::SE,
        ResizeHandle::SW,
    ];

    #[inline]
    pub fn moves_north(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    #[inline]
    pub fn moves_south(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }

    #[inline]
    pub fn moves_east(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    #[inline]
    pub fn moves_west(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    #[inline]
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeHandle::NE | ResizeHandle::NW | ResizeHandle::SE | ResizeHandle::SW
        )
    }

    /// CSS cursor for this handle
    pub fn cursor(self) -> &'static str {
        match self {
            ResizeHandle::N | ResizeHandle::S => "ns-resize",
            ResizeHandle::E | ResizeHandle::W => "ew-resize",
            ResizeHandle::NE | ResizeHandle::SW => "nesw-resize",
            ResizeHandle::NW | ResizeHandle::SE => "nwse-resize",
        }
    }
}

/// Region of a widget container
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetRegion {
    /// Header band (starts a drag)
    DragHandle,
    /// Widget content (forwarded to the widget)
    Content,
    MinimizeButton,
    SettingsButton,
    Resize(ResizeHandle),
}

impl WidgetRegion {
    #[inline]
    pub fn is_resize(&self) -> bool {
        matches!(self, WidgetRegion::Resize(_))
    }

    #[inline]
    pub fn resize_handle(&self) -> Option<ResizeHandle> {
        match self {
            WidgetRegion::Resize(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Get CSS cursor style for this region
    pub fn cursor(&self) -> &'static str {
        match self {
            WidgetRegion::DragHandle => "move",
            WidgetRegion::Content => "default",
            WidgetRegion::MinimizeButton | WidgetRegion::SettingsButton => "pointer",
            WidgetRegion::Resize(handle) => handle.cursor(),
        }
    }
}
