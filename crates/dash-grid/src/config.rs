//! Engine tunables
//!
//! Grid geometry (columns, row height, gap) is user state and lives in
//! `ApplicationState`; this struct holds the fixed knobs of the engine.

use serde::{Deserialize, Serialize};

/// Static configuration for a dashboard instance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Key of the persisted document in the store
    pub storage_key: String,
    /// Quiet period before a burst of mutations is written out
    pub persist_delay_ms: f64,
    /// Rows scanned by the empty-position search before falling back
    pub max_scan_rows: u32,
    /// Push-down attempts before the collision resolver gives up
    pub max_collision_attempts: u32,
    /// Duration of the container exit transition
    pub exit_transition_ms: f64,
    /// Height of the drag-handle band at the top of a container
    pub header_height_px: f32,
    /// Thickness of the edge and corner resize hotspots
    pub resize_handle_px: f32,
    /// Side of a header action button
    pub button_size_px: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            storage_key: "dashboard-state".to_string(),
            persist_delay_ms: 500.0,
            max_scan_rows: 100,
            max_collision_attempts: 100,
            exit_transition_ms: 200.0,
            header_height_px: 36.0,
            resize_handle_px: 8.0,
            button_size_px: 24.0,
        }
    }
}

impl DashboardConfig {
    /// Parse a config document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
