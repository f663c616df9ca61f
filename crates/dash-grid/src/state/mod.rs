//! Canonical application state
//!
//! [`StateManager`] owns the single [`ApplicationState`], exposes the named
//! mutation operations, publishes a [`StateEvent`] for every change and
//! schedules debounced persistence.

mod defaults;
mod event;
mod ids;
mod manager;
mod model;

pub use defaults::{default_settings, default_state, default_widgets, STATE_VERSION};
pub use event::{StateEvent, StateEventKind};
pub use ids::{assign_missing_ids, next_widget_id};
pub use manager::{LoadOutcome, StateManager};
pub use model::{
    ApplicationState, NewWidget, Settings, Theme, WidgetConfig, WidgetId, WidgetRecord, WidgetUpdate,
};
