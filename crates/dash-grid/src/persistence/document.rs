//! Persisted and exported documents
//!
//! The persisted document is `ApplicationState` plus `savedAt`; the export
//! document carries `grid`, `widgets`, `theme`, `settings`, `version` and
//! `exportedAt`. Both decode through [`decode_state`], which ignores unknown
//! fields, defaults missing ones, requires `widgets` to be a list, backfills
//! ids, rejects widgets reaching past [`MAX_LAYOUT_ROWS`] and pulls geometry
//! back inside the grid.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DocumentError, StorageError};
use crate::grid::GridSettings;
use crate::state::{
    assign_missing_ids, default_settings, ApplicationState, Settings, Theme, WidgetRecord, STATE_VERSION,
};

/// Rows a stored widget may reach; anything lower is rejected on decode
pub const MAX_LAYOUT_ROWS: u32 = 10_000;

/// Document written to the persistent store
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState<'a> {
    #[serde(flatten)]
    pub state: &'a ApplicationState,
    pub saved_at: f64,
}

impl<'a> PersistedState<'a> {
    pub fn new(state: &'a ApplicationState, saved_at: f64) -> Self {
        Self { state, saved_at }
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|e| StorageError::Serialize(e.to_string()))
    }
}

/// Export/import file format
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutExport {
    pub grid: GridSettings,
    pub widgets: Vec<WidgetRecord>,
    pub theme: Theme,
    pub settings: Settings,
    pub version: String,
    pub exported_at: f64,
}

impl LayoutExport {
    pub fn new(state: &ApplicationState, exported_at: f64) -> Self {
        Self {
            grid: state.grid,
            widgets: state.widgets.clone(),
            theme: state.theme,
            settings: state.settings.clone(),
            version: state.version.clone(),
            exported_at,
        }
    }

    /// Pretty-printed JSON for a download
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Parse document text into a JSON value
pub fn parse_document(text: &str) -> Result<Value, DocumentError> {
    serde_json::from_str(text).map_err(|e| DocumentError::Malformed(e.to_string()))
}

fn field_or<T: DeserializeOwned>(
    object: &Map<String, Value>,
    field: &'static str,
    fallback: impl FnOnce() -> T,
) -> Result<T, DocumentError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(fallback()),
        Some(value) => T::deserialize(value).map_err(|e| DocumentError::InvalidField {
            field,
            reason: e.to_string(),
        }),
    }
}

/// Validate and decode a persisted or exported document
pub fn decode_state(value: &Value) -> Result<ApplicationState, DocumentError> {
    let object = value.as_object().ok_or(DocumentError::NotAnObject)?;

    let items = match object.get("widgets") {
        None => return Err(DocumentError::MissingWidgets),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(DocumentError::WidgetsNotList),
    };

    let grid = field_or(object, "grid", GridSettings::default)?.normalized();
    let theme = field_or(object, "theme", Theme::default)?;
    let settings = field_or(object, "settings", default_settings)?;
    let version = field_or(object, "version", || STATE_VERSION.to_string())?;

    let mut widgets = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let widget = WidgetRecord::deserialize(item).map_err(|e| DocumentError::InvalidWidget {
                index,
                reason: e.to_string(),
            })?;
            if u64::from(widget.y) + u64::from(widget.h) > u64::from(MAX_LAYOUT_ROWS) {
                return Err(DocumentError::InvalidWidget {
                    index,
                    reason: format!("extends past row {MAX_LAYOUT_ROWS}"),
                });
            }
            Ok(widget)
        })
        .collect::<Result<Vec<_>, _>>()?;

    assign_missing_ids(&mut widgets);
    for widget in &mut widgets {
        let rect = widget.rect().clamp_to_columns(grid.columns);
        widget.set_rect(rect);
    }

    Ok(ApplicationState {
        grid,
        widgets,
        theme,
        settings,
        version,
    })
}
