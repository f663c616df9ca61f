//! Interaction events published by the grid engine

use serde::Serialize;

use crate::events::BusEvent;
use crate::input::ResizeHandle;
use crate::math::GridRect;
use crate::state::WidgetId;

/// Interaction telemetry and requests for the surrounding application
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GridEvent {
    #[serde(rename_all = "camelCase")]
    DragStart { widget_id: WidgetId, origin: GridRect },
    /// `committed` is `false` when the widget ended where it started
    #[serde(rename_all = "camelCase")]
    DragEnd {
        widget_id: WidgetId,
        rect: GridRect,
        committed: bool,
    },
    #[serde(rename_all = "camelCase")]
    ResizeStart {
        widget_id: WidgetId,
        handle: ResizeHandle,
        origin: GridRect,
    },
    #[serde(rename_all = "camelCase")]
    ResizeEnd {
        widget_id: WidgetId,
        rect: GridRect,
        committed: bool,
    },
    /// The user pressed a container's settings button
    #[serde(rename_all = "camelCase")]
    WidgetSettingsRequested { widget_id: WidgetId },
}

/// Topic of a [`GridEvent`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridEventKind {
    DragStart,
    DragEnd,
    ResizeStart,
    ResizeEnd,
    WidgetSettingsRequested,
}

impl GridEventKind {
    pub fn name(self) -> &'static str {
        match self {
            GridEventKind::DragStart => "drag-start",
            GridEventKind::DragEnd => "drag-end",
            GridEventKind::ResizeStart => "resize-start",
            GridEventKind::ResizeEnd => "resize-end",
            GridEventKind::WidgetSettingsRequested => "widget-settings-requested",
        }
    }
}

impl BusEvent for GridEvent {
    type Kind = GridEventKind;

    fn kind(&self) -> GridEventKind {
        match self {
            GridEvent::DragStart { .. } => GridEventKind::DragStart,
            GridEvent::DragEnd { .. } => GridEventKind::DragEnd,
            GridEvent::ResizeStart { .. } => GridEventKind::ResizeStart,
            GridEvent::ResizeEnd { .. } => GridEventKind::ResizeEnd,
            GridEvent::WidgetSettingsRequested { .. } => GridEventKind::WidgetSettingsRequested,
        }
    }
}

impl GridEvent {
    pub fn widget_id(&self) -> &str {
        match self {
            GridEvent::DragStart { widget_id, .. }
            | GridEvent::DragEnd { widget_id, .. }
            | GridEvent::ResizeStart { widget_id, .. }
            | GridEvent::ResizeEnd { widget_id, .. }
            | GridEvent::WidgetSettingsRequested { widget_id } => widget_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_tag_matches_topic() {
        let event = GridEvent::WidgetSettingsRequested { widget_id: "notes-1".into() };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, json!({"type": "widget-settings-requested", "widgetId": "notes-1"}));
        assert_eq!(value["type"], event.kind().name());
    }

    #[test]
    fn test_end_event_shape() {
        let event = GridEvent::DragEnd {
            widget_id: "clock-1".into(),
            rect: GridRect::new(1, 0, 3, 2),
            committed: true,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "drag-end");
        assert_eq!(value["rect"], json!({"x": 1, "y": 0, "w": 3, "h": 2}));
        assert_eq!(event.widget_id(), "clock-1");
    }
}
