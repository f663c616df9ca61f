//! State change events

use crate::error::{DocumentError, LoadError, StorageError};
use crate::events::BusEvent;
use crate::grid::GridSettings;
use crate::persistence::LayoutExport;
use super::model::{ApplicationState, Settings, Theme, WidgetRecord, WidgetUpdate};

/// Event published by the state manager
#[derive(Clone, Debug, PartialEq)]
pub enum StateEvent {
    WidgetAdded {
        widget: WidgetRecord,
    },
    WidgetUpdated {
        widget: WidgetRecord,
        old: WidgetRecord,
        updates: WidgetUpdate,
    },
    WidgetRemoved {
        widget: WidgetRecord,
    },
    ThemeChanged {
        theme: Theme,
        old_theme: Theme,
    },
    SettingsUpdated {
        settings: Settings,
        updates: Settings,
    },
    GridUpdated {
        grid: GridSettings,
        old: GridSettings,
    },
    LayoutExported {
        export: LayoutExport,
    },
    LayoutImported {
        /// State as it was before the import
        backup: Box<ApplicationState>,
    },
    ImportError {
        error: DocumentError,
    },
    LayoutReset,
    StateLoaded,
    LoadError {
        error: LoadError,
    },
    StorageError {
        error: StorageError,
    },
    StateSaved {
        saved_at: f64,
        bytes: usize,
    },
}

/// Topic of a [`StateEvent`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateEventKind {
    WidgetAdded,
    WidgetUpdated,
    WidgetRemoved,
    ThemeChanged,
    SettingsUpdated,
    GridUpdated,
    LayoutExported,
    LayoutImported,
    ImportError,
    LayoutReset,
    StateLoaded,
    LoadError,
    StorageError,
    StateSaved,
}

impl StateEventKind {
    /// Wire name of the topic
    pub fn name(self) -> &'static str {
        match self {
            StateEventKind::WidgetAdded => "widget-added",
            StateEventKind::WidgetUpdated => "widget-updated",
            StateEventKind::WidgetRemoved => "widget-removed",
            StateEventKind::ThemeChanged => "theme-changed",
            StateEventKind::SettingsUpdated => "settings-updated",
            StateEventKind::GridUpdated => "grid-updated",
            StateEventKind::LayoutExported => "layout-exported",
            StateEventKind::LayoutImported => "layout-imported",
            StateEventKind::ImportError => "import-error",
            StateEventKind::LayoutReset => "layout-reset",
            StateEventKind::StateLoaded => "state-loaded",
            StateEventKind::LoadError => "load-error",
            StateEventKind::StorageError => "storage-error",
            StateEventKind::StateSaved => "state-saved",
        }
    }

    /// Whether events of this kind changed canonical state
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            StateEventKind::WidgetAdded
                | StateEventKind::WidgetUpdated
                | StateEventKind::WidgetRemoved
                | StateEventKind::ThemeChanged
                | StateEventKind::SettingsUpdated
                | StateEventKind::GridUpdated
                | StateEventKind::LayoutImported
                | StateEventKind::LayoutReset
                | StateEventKind::StateLoaded
        )
    }
}

impl BusEvent for StateEvent {
    type Kind = StateEventKind;

    fn kind(&self) -> StateEventKind {
        match self {
            StateEvent::WidgetAdded { .. } => StateEventKind::WidgetAdded,
            StateEvent::WidgetUpdated { .. } => StateEventKind::WidgetUpdated,
            StateEvent::WidgetRemoved { .. } => StateEventKind::WidgetRemoved,
            StateEvent::ThemeChanged { .. } => StateEventKind::ThemeChanged,
            StateEvent::SettingsUpdated { .. } => StateEventKind::SettingsUpdated,
            StateEvent::GridUpdated { .. } => StateEventKind::GridUpdated,
            StateEvent::LayoutExported { .. } => StateEventKind::LayoutExported,
            StateEvent::LayoutImported { .. } => StateEventKind::LayoutImported,
            StateEvent::ImportError { .. } => StateEventKind::ImportError,
            StateEvent::LayoutReset => StateEventKind::LayoutReset,
            StateEvent::StateLoaded => StateEventKind::StateLoaded,
            StateEvent::LoadError { .. } => StateEventKind::LoadError,
            StateEvent::StorageError { .. } => StateEventKind::StorageError,
            StateEvent::StateSaved { .. } => StateEventKind::StateSaved,
        }
    }
}

impl StateEvent {
    /// Wire name of this event's topic
    #[inline]
    pub fn topic(&self) -> &'static str {
        self.kind().name()
    }

    /// Whether this event changed canonical state
    #[inline]
    pub fn is_mutation(&self) -> bool {
        self.kind().is_mutation()
    }
}
