//! Data model

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use crate::grid::GridSettings;
use crate::math::GridRect;
use super::defaults::{default_settings, STATE_VERSION};

/// Unique widget identifier, `"<type>-<n>"` when generated
pub type WidgetId = String;

/// Opaque widget-specific configuration
pub type WidgetConfig = serde_json::Map<String, serde_json::Value>;

/// Boolean feature flags
pub type Settings = BTreeMap<String, bool>;

const DEFAULT_WIDTH: u32 = 3;
const DEFAULT_HEIGHT: u32 = 2;

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

/// One placed widget
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetRecord {
    /// Missing ids are backfilled on load and import
    #[serde(default)]
    pub id: WidgetId,
    /// Type tag resolved by the widget registry
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub y: u32,
    #[serde(default = "default_width")]
    pub w: u32,
    #[serde(default = "default_height")]
    pub h: u32,
    /// Collapses content, keeps the grid footprint
    #[serde(default)]
    pub minimized: bool,
    #[serde(default)]
    pub config: WidgetConfig,
}

impl WidgetRecord {
    /// Grid footprint
    #[inline]
    pub fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }

    pub fn set_rect(&mut self, rect: GridRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.w = rect.w;
        self.h = rect.h;
    }

    /// Display title: `config.title` when it is a non-empty string, else the type tag
    pub fn title(&self) -> &str {
        self.config
            .get("title")
            .and_then(|v| v.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.widget_type)
    }
}

/// Input to `StateManager::add_widget`; unset fields take defaults
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewWidget {
    #[serde(rename = "type")]
    pub widget_type: String,
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub minimized: Option<bool>,
    pub config: WidgetConfig,
}

impl NewWidget {
    pub fn new(widget_type: impl Into<String>) -> Self {
        Self {
            widget_type: widget_type.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, x: u32, y: u32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn size(mut self, w: u32, h: u32) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }

    pub fn with_config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether an explicit position was given for either axis
    pub fn has_position(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }

    pub(crate) fn width(&self) -> u32 {
        self.w.unwrap_or(DEFAULT_WIDTH)
    }

    pub(crate) fn height(&self) -> u32 {
        self.h.unwrap_or(DEFAULT_HEIGHT)
    }
}

/// Partial update merged into a [`WidgetRecord`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<WidgetConfig>,
}

impl WidgetUpdate {
    pub fn position(x: u32, y: u32) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    pub fn size(w: u32, h: u32) -> Self {
        Self { w: Some(w), h: Some(h), ..Default::default() }
    }

    pub fn rect(rect: GridRect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            w: Some(rect.w),
            h: Some(rect.h),
            ..Default::default()
        }
    }

    pub fn minimized(minimized: bool) -> Self {
        Self { minimized: Some(minimized), ..Default::default() }
    }

    pub fn config(config: WidgetConfig) -> Self {
        Self { config: Some(config), ..Default::default() }
    }

    /// Shallow merge into a record
    pub fn apply(&self, record: &mut WidgetRecord) {
        if let Some(x) = self.x {
            record.x = x;
        }
        if let Some(y) = self.y {
            record.y = y;
        }
        if let Some(w) = self.w {
            record.w = w;
        }
        if let Some(h) = self.h {
            record.h = h;
        }
        if let Some(minimized) = self.minimized {
            record.minimized = minimized;
        }
        if let Some(config) = &self.config {
            record.config = config.clone();
        }
    }

    /// Whether the update touches the grid footprint
    pub fn touches_geometry(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.w.is_some() || self.h.is_some()
    }
}

/// Colour theme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Amoled,
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Amoled => "amoled",
            Theme::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "amoled" => Ok(Theme::Amoled),
            "system" => Ok(Theme::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

fn default_version() -> String {
    STATE_VERSION.to_string()
}

/// The whole dashboard state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicationState {
    #[serde(default)]
    pub grid: GridSettings,
    /// Creation order; irrelevant to layout
    pub widgets: Vec<WidgetRecord>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_settings")]
    pub settings: Settings,
    #[serde(default = "default_version")]
    pub version: String,
}

impl ApplicationState {
    pub fn widget(&self, id: &str) -> Option<&WidgetRecord> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub(crate) fn widget_mut(&mut self, id: &str) -> Option<&mut WidgetRecord> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    /// Footprints of every widget except `exclude`
    pub fn rects_except(&self, exclude: &str) -> Vec<GridRect> {
        self.widgets
            .iter()
            .filter(|w| w.id != exclude)
            .map(WidgetRecord::rect)
            .collect()
    }

    /// Feature flag lookup; absent flags read as `default`
    pub fn flag(&self, name: &str, default: bool) -> bool {
        self.settings.get(name).copied().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_json_shape() {
        let record = WidgetRecord {
            id: "clock-1".into(),
            widget_type: "clock".into(),
            x: 1,
            y: 2,
            w: 3,
            h: 4,
            minimized: false,
            config: WidgetConfig::new(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"id": "clock-1", "type": "clock", "x": 1, "y": 2, "w": 3, "h": 4, "minimized": false, "config": {}})
        );
    }

    #[test]
    fn test_record_defaults_on_decode() {
        let record: WidgetRecord = serde_json::from_value(json!({"type": "notes"})).unwrap();
        assert_eq!(record.id, "");
        assert_eq!(record.rect(), GridRect::new(0, 0, 3, 2));
        assert!(!record.minimized);
    }

    #[test]
    fn test_title_from_config() {
        let mut record: WidgetRecord = serde_json::from_value(json!({"type": "notes"})).unwrap();
        assert_eq!(record.title(), "notes");
        record.config.insert("title".into(), json!("Shopping"));
        assert_eq!(record.title(), "Shopping");
        record.config.insert("title".into(), json!(42));
        assert_eq!(record.title(), "notes");
    }

    #[test]
    fn test_update_merges_only_set_fields() {
        let mut record: WidgetRecord = serde_json::from_value(json!({"type": "todo", "x": 4})).unwrap();
        WidgetUpdate { y: Some(7), minimized: Some(true), ..Default::default() }.apply(&mut record);
        assert_eq!(record.rect(), GridRect::new(4, 7, 3, 2));
        assert!(record.minimized);
    }

    #[test]
    fn test_update_serializes_sparse() {
        let value = serde_json::to_value(WidgetUpdate::position(1, 2)).unwrap();
        assert_eq!(value, json!({"x": 1, "y": 2}));
    }

    #[test]
    fn test_theme_round_trip() {
        for theme in [Theme::Light, Theme::Dark, Theme::Amoled, Theme::System] {
            assert_eq!(theme.as_str().parse::<Theme>().unwrap(), theme);
            assert_eq!(serde_json::to_value(theme).unwrap(), json!(theme.as_str()));
        }
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn test_new_widget_from_json() {
        let new: NewWidget = serde_json::from_value(json!({"type": "quotes", "w": 6})).unwrap();
        assert_eq!(new.widget_type, "quotes");
        assert_eq!(new.width(), 6);
        assert_eq!(new.height(), 2);
        assert!(!new.has_position());
    }
}
