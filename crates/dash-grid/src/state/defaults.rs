//! Built-in default layout

use serde_json::json;
use crate::grid::GridSettings;
use super::model::{ApplicationState, Settings, Theme, WidgetConfig, WidgetRecord};

/// Version stamped into new and exported state
pub const STATE_VERSION: &str = "1.0.0";

/// Feature flags of a fresh dashboard
pub fn default_settings() -> Settings {
    [
        ("animations", true),
        ("showGridLines", false),
        ("compactMode", false),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn widget(id: &str, widget_type: &str, (x, y, w, h): (u32, u32, u32, u32), config: serde_json::Value) -> WidgetRecord {
    let config: WidgetConfig = match config {
        serde_json::Value::Object(map) => map,
        _ => WidgetConfig::new(),
    };
    WidgetRecord {
        id: id.to_string(),
        widget_type: widget_type.to_string(),
        x,
        y,
        w,
        h,
        minimized: false,
        config,
    }
}

/// Ten widgets in three rows on a 12-column grid
pub fn default_widgets() -> Vec<WidgetRecord> {
    vec![
        widget("clock-1", "clock", (0, 0, 3, 2), json!({"title": "Clock", "format24h": true})),
        widget("weather-1", "weather", (3, 0, 3, 2), json!({"title": "Weather", "location": "auto", "units": "metric"})),
        widget("quotes-1", "quotes", (6, 0, 6, 2), json!({"title": "Quote of the Day"})),
        widget("notes-1", "notes", (0, 2, 4, 3), json!({"title": "Notes", "content": ""})),
        widget("todo-1", "todo", (4, 2, 4, 3), json!({"title": "Tasks", "items": []})),
        widget("pomodoro-1", "pomodoro", (8, 2, 4, 3), json!({"title": "Focus Timer", "workMinutes": 25, "breakMinutes": 5})),
        widget("calendar-1", "calendar", (0, 5, 3, 3), json!({"title": "Calendar"})),
        widget("stocks-1", "stocks", (3, 5, 3, 3), json!({"title": "Markets", "symbols": ["AAPL", "MSFT", "GOOG"]})),
        widget("links-1", "links", (6, 5, 3, 3), json!({"title": "Links", "links": []})),
        widget("system-1", "system", (9, 5, 3, 3), json!({"title": "System"})),
    ]
}

/// Fresh state used on first run, on load failure and on reset
pub fn default_state() -> ApplicationState {
    ApplicationState {
        grid: GridSettings::default(),
        widgets: default_widgets(),
        theme: Theme::default(),
        settings: default_settings(),
        version: STATE_VERSION.to_string(),
    }
}
