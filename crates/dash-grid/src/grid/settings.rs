//! Grid settings

use serde::{Deserialize, Serialize};

/// Process-wide grid geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    /// Number of columns (> 0)
    pub columns: u32,
    /// Row height in pixels (> 0)
    pub row_height: u32,
    /// Gap between cells in pixels
    pub gap: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            columns: 12,
            row_height: 80,
            gap: 16,
        }
    }
}

impl GridSettings {
    /// Replace zero columns or row height with the defaults
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            columns: if self.columns == 0 { defaults.columns } else { self.columns },
            row_height: if self.row_height == 0 { defaults.row_height } else { self.row_height },
            gap: self.gap,
        }
    }
}

/// Partial update of [`GridSettings`]; zero columns or row height are ignored
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,
}

impl GridUpdate {
    pub fn apply(&self, grid: &mut GridSettings) {
        if let Some(columns) = self.columns.filter(|c| *c > 0) {
            grid.columns = columns;
        }
        if let Some(row_height) = self.row_height.filter(|r| *r > 0) {
            grid.row_height = row_height;
        }
        if let Some(gap) = self.gap {
            grid.gap = gap;
        }
    }
}
