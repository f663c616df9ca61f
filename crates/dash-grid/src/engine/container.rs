//! Mounted widget containers

use std::fmt;

use serde::Serialize;

use crate::error::WidgetError;
use crate::grid::{GridArea, GridMetrics};
use crate::math::{GridRect, ScreenRect};
use crate::state::{WidgetId, WidgetRecord};
use crate::widget::{VisualHandle, WidgetInstance};

/// Lifecycle of a container in the render tree
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContainerPhase {
    Mounted,
    /// Exit transition running; detached once the clock passes `detach_at_ms`
    Exiting { detach_at_ms: f64 },
}

/// Header action buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerAction {
    Minimize,
    OpenSettings,
}

/// What fills a container's body
pub enum ContainerContent {
    Widget(Box<dyn WidgetInstance>),
    /// Inline error placeholder for a widget that could not be built
    Failed(WidgetError),
}

impl fmt::Debug for ContainerContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerContent::Widget(_) => f.write_str("Widget"),
            ContainerContent::Failed(error) => f.debug_tuple("Failed").field(error).finish(),
        }
    }
}

/// Render-side representation of one widget record
#[derive(Debug)]
pub struct WidgetContainer {
    widget_id: WidgetId,
    widget_type: String,
    title: String,
    rect: GridRect,
    minimized: bool,
    phase: ContainerPhase,
    content: ContainerContent,
}

impl WidgetContainer {
    pub(crate) fn new(record: &WidgetRecord, content: ContainerContent) -> Self {
        Self {
            widget_id: record.id.clone(),
            widget_type: record.widget_type.clone(),
            title: record.title().to_string(),
            rect: record.rect(),
            minimized: record.minimized,
            phase: ContainerPhase::Mounted,
            content,
        }
    }

    #[inline]
    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    #[inline]
    pub fn widget_type(&self) -> &str {
        &self.widget_type
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn rect(&self) -> GridRect {
        self.rect
    }

    #[inline]
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    #[inline]
    pub fn phase(&self) -> ContainerPhase {
        self.phase
    }

    #[inline]
    pub fn is_exiting(&self) -> bool {
        matches!(self.phase, ContainerPhase::Exiting { .. })
    }

    pub fn content(&self) -> &ContainerContent {
        &self.content
    }

    /// Visual of the live widget, if one was built
    pub fn visual(&self) -> Option<VisualHandle> {
        match &self.content {
            ContainerContent::Widget(widget) => Some(widget.visual()),
            ContainerContent::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&WidgetError> {
        match &self.content {
            ContainerContent::Failed(error) => Some(error),
            ContainerContent::Widget(_) => None,
        }
    }

    /// Reposition, retitle and restyle from an updated record.
    ///
    /// The config is forwarded only when it differs from what the live
    /// widget already holds, so a widget's own change does not echo back.
    pub(crate) fn apply_record(&mut self, record: &WidgetRecord) {
        self.rect = record.rect();
        self.title = record.title().to_string();
        self.minimized = record.minimized;
        if let ContainerContent::Widget(widget) = &mut self.content {
            if widget.config() != record.config {
                widget.set_config(record.config.clone());
            }
        }
    }

    pub(crate) fn begin_exit(&mut self, detach_at_ms: f64) {
        self.phase = ContainerPhase::Exiting { detach_at_ms };
    }

    /// Tear down; runs the widget's destroy hook
    pub(crate) fn detach(mut self) {
        if let ContainerContent::Widget(widget) = &mut self.content {
            widget.destroy();
        }
    }

    /// Snapshot for the host renderer
    pub fn view(&self, metrics: &GridMetrics, focused: bool) -> ContainerView {
        let area = GridArea::from(self.rect);
        ContainerView {
            widget_id: self.widget_id.clone(),
            widget_type: self.widget_type.clone(),
            title: self.title.clone(),
            rect: self.rect,
            grid_column: area.grid_column(),
            grid_row: area.grid_row(),
            screen_rect: metrics.grid_to_screen(self.rect),
            minimized: self.minimized,
            exiting: self.is_exiting(),
            focused,
            error: self.error().map(ToString::to_string),
        }
    }
}

/// Serializable container snapshot
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerView {
    pub widget_id: WidgetId,
    pub widget_type: String,
    pub title: String,
    pub rect: GridRect,
    /// CSS `grid-column` value
    pub grid_column: String,
    /// CSS `grid-row` value
    pub grid_row: String,
    pub screen_rect: ScreenRect,
    pub minimized: bool,
    pub exiting: bool,
    pub focused: bool,
    /// Placeholder message when the widget failed to build
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
