//! WASM surface
//!
//! Structured values cross the boundary as JSON strings. Pointer and key
//! handlers return an `InputResult` document, state getters return the
//! serialized model, and state or grid events queue up until the page
//! drains them.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::str::FromStr;

use dash_grid::{
    ContainerAction, Dashboard, DashboardConfig, GridEvent, GridUpdate, KeyInput, NewWidget, Settings, StateEvent,
    Subscription, Theme, Topic, Vec2, WidgetConfig, WidgetUpdate,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn, Level};
use wasm_bindgen::prelude::*;

use crate::clock::DateClock;
use crate::logging;
use crate::storage::LocalStorage;
use crate::widget::{host_registry, HostContexts};

const UNHANDLED: &str = r#"{"type":"unhandled"}"#;

type EventQueue = Rc<RefCell<VecDeque<Value>>>;

/// Dashboard controller exported to JavaScript
#[wasm_bindgen]
pub struct DashboardHandle {
    dashboard: Dashboard,
    contexts: HostContexts,
    events: EventQueue,
    subscriptions: Vec<Subscription>,
}

#[wasm_bindgen]
impl DashboardHandle {
    /// Start a dashboard; `config_json` overrides engine tunables
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<DashboardHandle, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        logging::init(Level::INFO);

        let config = match config_json.as_deref() {
            Some(json) => DashboardConfig::from_json(json)
                .map_err(|e| JsValue::from_str(&format!("invalid dashboard config: {e}")))?,
            None => DashboardConfig::default(),
        };

        let storage = LocalStorage::open();
        if !storage.is_available() {
            logging::log("[dash-web] localStorage unavailable, layout will not persist");
        }

        let contexts = HostContexts::new();
        let dashboard = Dashboard::new(
            Box::new(storage),
            host_registry(&contexts),
            Rc::new(DateClock),
            config,
        );

        let events: EventQueue = Rc::default();
        let state_queue = Rc::clone(&events);
        let grid_queue = Rc::clone(&events);
        let subscriptions = vec![
            dashboard
                .state()
                .subscribe(Topic::All, move |event| state_queue.borrow_mut().push_back(state_event_json(event))),
            dashboard
                .engine()
                .subscribe(Topic::All, move |event| grid_queue.borrow_mut().push_back(grid_event_json(event))),
        ];

        info!(widgets = dashboard.state().with_state(|s| s.widgets.len()), "dash-web ready");

        Ok(Self {
            dashboard,
            contexts,
            events,
            subscriptions,
        })
    }

    // =========================================================================
    // Viewport and pumping
    // =========================================================================

    /// Place the grid on the page
    #[wasm_bindgen]
    pub fn set_viewport(&mut self, x: f32, y: f32, width: f32) {
        self.dashboard.engine_mut().set_viewport(Vec2::new(x, y), width);
    }

    /// Drive timers; call once per animation frame
    #[wasm_bindgen]
    pub fn tick(&mut self) -> bool {
        self.dashboard.tick()
    }

    /// Write any pending save now
    #[wasm_bindgen]
    pub fn flush(&self) -> bool {
        self.dashboard.state().flush()
    }

    #[wasm_bindgen]
    pub fn has_pending_save(&self) -> bool {
        self.dashboard.state().has_pending_save()
    }

    /// Tear down; call from `beforeunload`
    #[wasm_bindgen]
    pub fn shutdown(&mut self) {
        self.dashboard.shutdown();
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    #[wasm_bindgen]
    pub fn pointer_down(&mut self, x: f32, y: f32) -> String {
        let result = self.dashboard.engine_mut().handle_pointer_down(x, y);
        to_json(&result, UNHANDLED)
    }

    #[wasm_bindgen]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> String {
        let result = self.dashboard.engine_mut().handle_pointer_move(x, y);
        to_json(&result, UNHANDLED)
    }

    #[wasm_bindgen]
    pub fn pointer_up(&mut self) -> String {
        let result = self.dashboard.engine_mut().handle_pointer_up();
        to_json(&result, UNHANDLED)
    }

    /// Handle a `keydown`; `event_json` carries `key`, `shiftKey`, `ctrlKey`, `metaKey`
    #[wasm_bindgen]
    pub fn key_down(&mut self, event_json: &str) -> String {
        let input: KeyInput = match serde_json::from_str(event_json) {
            Ok(input) => input,
            Err(error) => {
                warn!(%error, "bad key event");
                return UNHANDLED.to_string();
            }
        };
        let result = self.dashboard.engine_mut().handle_key(&input);
        to_json(&result, UNHANDLED)
    }

    #[wasm_bindgen]
    pub fn focus(&mut self, widget_id: &str) -> bool {
        self.dashboard.engine_mut().focus(widget_id)
    }

    #[wasm_bindgen]
    pub fn blur(&mut self) {
        self.dashboard.engine_mut().blur();
    }

    #[wasm_bindgen]
    pub fn focused(&self) -> Option<String> {
        self.dashboard.engine().focused()
    }

    /// Run a header action: `"minimize"` or `"settings"`
    #[wasm_bindgen]
    pub fn trigger_action(&mut self, widget_id: &str, action: &str) -> bool {
        let action = match action {
            "minimize" => ContainerAction::Minimize,
            "settings" => ContainerAction::OpenSettings,
            other => {
                warn!(action = other, "unknown container action");
                return false;
            }
        };
        self.dashboard.engine_mut().trigger_action(widget_id, action)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Container views in creation order
    #[wasm_bindgen]
    pub fn views_json(&self) -> String {
        to_json(&self.dashboard.engine().views(), "[]")
    }

    /// Ghost rectangle of the active gesture, or `null`
    #[wasm_bindgen]
    pub fn preview_json(&self) -> String {
        to_json(&self.dashboard.engine().preview(), "null")
    }

    #[wasm_bindgen]
    pub fn state_json(&self) -> String {
        self.dashboard
            .state()
            .with_state(|state| to_json(state, "null"))
    }

    /// Queued state and grid events, oldest first
    #[wasm_bindgen]
    pub fn drain_events(&self) -> String {
        let events: Vec<Value> = self.events.borrow_mut().drain(..).collect();
        to_json(&events, "[]")
    }

    // =========================================================================
    // Widgets
    // =========================================================================

    /// Add a widget from `{type, x?, y?, w?, h?, minimized?, config?}`
    #[wasm_bindgen]
    pub fn add_widget(&self, widget_json: &str) -> Result<String, JsValue> {
        let new: NewWidget = serde_json::from_str(widget_json)
            .map_err(|e| JsValue::from_str(&format!("invalid widget: {e}")))?;
        let record = self.dashboard.state().add_widget(new);
        serde_json::to_string(&record).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn update_widget(&self, widget_id: &str, updates_json: &str) -> bool {
        match serde_json::from_str::<WidgetUpdate>(updates_json) {
            Ok(updates) => self.dashboard.state().update_widget(widget_id, updates),
            Err(error) => {
                warn!(widget_id, %error, "bad widget update");
                false
            }
        }
    }

    #[wasm_bindgen]
    pub fn move_widget(&self, widget_id: &str, x: u32, y: u32) -> bool {
        self.dashboard.state().move_widget(widget_id, x, y)
    }

    #[wasm_bindgen]
    pub fn resize_widget(&self, widget_id: &str, w: u32, h: u32) -> bool {
        self.dashboard.state().resize_widget(widget_id, w, h)
    }

    #[wasm_bindgen]
    pub fn toggle_minimized(&self, widget_id: &str) -> bool {
        self.dashboard.state().toggle_minimized(widget_id)
    }

    #[wasm_bindgen]
    pub fn remove_widget(&self, widget_id: &str) -> bool {
        self.dashboard.state().remove_widget(widget_id)
    }

    /// The copy's record, or `None` when the id is unknown
    #[wasm_bindgen]
    pub fn duplicate_widget(&self, widget_id: &str) -> Option<String> {
        self.dashboard
            .state()
            .duplicate_widget(widget_id)
            .and_then(|record| serde_json::to_string(&record).ok())
    }

    /// A painted widget edited its own config
    #[wasm_bindgen]
    pub fn widget_config_changed(&self, widget_id: &str, config_json: &str) -> bool {
        let Some(ctx) = self.contexts.get(widget_id) else {
            return false;
        };
        match serde_json::from_str::<WidgetConfig>(config_json) {
            Ok(config) => {
                ctx.config_changed(config);
                true
            }
            Err(error) => {
                warn!(widget_id, %error, "bad widget config");
                false
            }
        }
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    #[wasm_bindgen]
    pub fn set_theme(&self, theme: &str) -> bool {
        match Theme::from_str(theme) {
            Ok(theme) => {
                self.dashboard.state().set_theme(theme);
                true
            }
            Err(error) => {
                warn!(%error, "theme rejected");
                false
            }
        }
    }

    /// Merge `{name: bool}` flags into the settings
    #[wasm_bindgen]
    pub fn update_settings(&self, settings_json: &str) -> bool {
        match serde_json::from_str::<Settings>(settings_json) {
            Ok(updates) => {
                self.dashboard.state().update_settings(updates);
                true
            }
            Err(error) => {
                warn!(%error, "bad settings update");
                false
            }
        }
    }

    /// Merge `{columns?, rowHeight?, gap?}` into the grid
    #[wasm_bindgen]
    pub fn update_grid(&self, grid_json: &str) -> bool {
        match serde_json::from_str::<GridUpdate>(grid_json) {
            Ok(update) => {
                self.dashboard.state().update_grid(update);
                true
            }
            Err(error) => {
                warn!(%error, "bad grid update");
                false
            }
        }
    }

    // =========================================================================
    // Layout documents
    // =========================================================================

    /// Pretty-printed export document for download
    #[wasm_bindgen]
    pub fn export_layout(&self) -> String {
        let export = self.dashboard.state().export_layout();
        serde_json::to_string_pretty(&export).unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the layout from an uploaded document
    #[wasm_bindgen]
    pub fn import_layout(&self, text: &str) -> bool {
        self.dashboard.state().import_layout_str(text)
    }

    #[wasm_bindgen]
    pub fn reset_to_default(&self) {
        self.dashboard.state().reset_to_default();
    }

    /// Re-read the persisted snapshot
    #[wasm_bindgen]
    pub fn reload(&self) -> bool {
        self.dashboard.state().reload()
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

/// Host-facing form of a state event
fn state_event_json(event: &StateEvent) -> Value {
    let mut out = json!({ "source": "state", "type": event.topic() });
    match event {
        StateEvent::WidgetAdded { widget }
        | StateEvent::WidgetUpdated { widget, .. }
        | StateEvent::WidgetRemoved { widget } => {
            out["widget"] = serde_json::to_value(widget).unwrap_or(Value::Null);
        }
        StateEvent::ThemeChanged { theme, old_theme } => {
            out["theme"] = json!(theme.as_str());
            out["oldTheme"] = json!(old_theme.as_str());
        }
        StateEvent::SettingsUpdated { settings, .. } => {
            out["settings"] = json!(settings);
        }
        StateEvent::GridUpdated { grid, .. } => {
            out["grid"] = serde_json::to_value(grid).unwrap_or(Value::Null);
        }
        StateEvent::ImportError { error } => {
            out["error"] = json!(error.to_string());
        }
        StateEvent::LoadError { error } => {
            out["error"] = json!(error.to_string());
        }
        StateEvent::StorageError { error } => {
            out["error"] = json!(error.to_string());
        }
        StateEvent::StateSaved { saved_at, bytes } => {
            out["savedAt"] = json!(saved_at);
            out["bytes"] = json!(bytes);
        }
        StateEvent::LayoutExported { .. }
        | StateEvent::LayoutImported { .. }
        | StateEvent::LayoutReset
        | StateEvent::StateLoaded => {}
    }
    out
}

fn grid_event_json(event: &GridEvent) -> Value {
    let mut out = serde_json::to_value(event).unwrap_or_else(|_| json!({}));
    if let Value::Object(fields) = &mut out {
        fields.insert("source".to_string(), json!("grid"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_grid::{BusEvent, StorageError, WidgetRecord};

    fn record(id: &str) -> WidgetRecord {
        WidgetRecord {
            id: id.to_string(),
            widget_type: "notes".to_string(),
            x: 0,
            y: 0,
            w: 3,
            h: 2,
            minimized: false,
            config: WidgetConfig::new(),
        }
    }

    #[test]
    fn test_widget_event_carries_record() {
        let out = state_event_json(&StateEvent::WidgetAdded { widget: record("notes-1") });
        assert_eq!(out["source"], "state");
        assert_eq!(out["type"], "widget-added");
        assert_eq!(out["widget"]["id"], "notes-1");
    }

    #[test]
    fn test_error_event_is_described() {
        let event = StateEvent::StorageError {
            error: StorageError::QuotaExceeded("full".into()),
        };
        let out = state_event_json(&event);
        assert_eq!(out["type"], event.kind().name());
        assert!(out["error"].as_str().is_some_and(|e| e.contains("full")));
    }

    #[test]
    fn test_grid_event_is_tagged() {
        let out = grid_event_json(&GridEvent::WidgetSettingsRequested {
            widget_id: "clock-1".into(),
        });
        assert_eq!(out["source"], "grid");
        assert_eq!(out["type"], "widget-settings-requested");
        assert_eq!(out["widgetId"], "clock-1");
    }
}
