//! Widget dashboard core
//!
//! This crate provides everything behind a grid-based widget dashboard
//! except the pixels:
//! - Canonical layout state with change events and debounced persistence
//! - Empty-slot placement and push-down collision resolution
//! - Pointer drag/resize gestures and a keyboard alternate path
//! - A render tree of widget containers kept in step with state
//! - Layout import/export
//!
//! ## Architecture
//!
//! - [`math`]: Geometry types (`Vec2`, `ScreenRect`, `GridRect`)
//! - [`grid`]: Grid settings, pixel ↔ cell metrics, placement algorithms
//! - [`state`]: Data model and the [`StateManager`]
//! - [`events`]: Single-threaded typed event bus
//! - [`persistence`]: Store abstraction, documents, save scheduling
//! - [`widget`]: Widget host adapter and factory registry
//! - [`input`]: Hit testing, gesture state machine, keyboard mapping
//! - [`engine`]: The [`GridEngine`]
//! - [`dashboard`]: The [`Dashboard`] application context
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use dash_grid::{Dashboard, DashboardConfig, MemoryStorage, NewWidget, SystemClock, WidgetRegistry};
//!
//! let mut dashboard = Dashboard::new(
//!     Box::new(MemoryStorage::new()),
//!     WidgetRegistry::new(),
//!     Rc::new(SystemClock),
//!     DashboardConfig::default(),
//! );
//!
//! let clock = dashboard.state().add_widget(NewWidget::new("clock").size(3, 2));
//! assert!(dashboard.state().get_widget(&clock.id).is_some());
//! dashboard.shutdown();
//! ```
//!
//! ## Design Principles
//!
//! 1. **Single trusted store**: only `StateManager` methods mutate state, and
//!    every mutation is published
//! 2. **Time Abstraction**: debounce and transitions read an injectable clock
//! 3. **No browser dependencies**: the web host lives in `dash-web`

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod input;
pub mod math;
pub mod persistence;
pub mod state;
pub mod widget;

// Re-export core types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use engine::{ContainerAction, ContainerView, GridEngine, GridEvent, GridEventKind, Preview, PreviewKind};
pub use error::{DocumentError, LoadError, StorageError, WidgetError};
pub use events::{BusEvent, EventBus, Subscription, Topic};
pub use grid::{GridArea, GridMetrics, GridSettings, GridUpdate};
pub use input::{InputResult, KeyInput, ResizeHandle, WidgetRegion};
pub use math::{GridRect, ScreenRect, Vec2};
pub use persistence::{LayoutExport, MemoryStorage, Storage};
pub use state::{
    ApplicationState, LoadOutcome, NewWidget, Settings, StateEvent, StateEventKind, StateManager, Theme,
    WidgetConfig, WidgetId, WidgetRecord, WidgetUpdate,
};
pub use widget::{ConfigNotifier, VisualHandle, WidgetContext, WidgetInstance, WidgetRegistry};
