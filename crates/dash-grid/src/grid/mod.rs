//! Grid model and placement algorithms
//!
//! - `settings`: column count, row height and gap
//! - `metrics`: pixel ↔ cell conversion for a given container width
//! - `placement`: empty-position search, push-down collision resolution and
//!   refitting a layout to a new column count

mod metrics;
mod placement;
mod settings;

pub use metrics::{GridArea, GridMetrics};
pub use placement::{find_empty_position, fit_to_columns, resolve_collision, Resolution};
pub use settings::{GridSettings, GridUpdate};
