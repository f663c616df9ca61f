//! Browser host for the widget dashboard
//!
//! Wires `dash-grid` to the page:
//! - [`LocalStorage`]: the persistent store over `window.localStorage`
//! - [`DateClock`]: `Date.now()` as the dashboard clock
//! - [`logging`]: `tracing` output forwarded to the browser console
//! - [`HostWidget`]: widget instances whose leaf content JavaScript paints
//! - [`DashboardHandle`]: the wasm-bindgen surface, JSON in and out

mod clock;
mod handle;
pub mod logging;
mod storage;
mod widget;

pub use clock::DateClock;
pub use handle::DashboardHandle;
pub use storage::LocalStorage;
pub use widget::{host_registry, HostContexts, HostVisual, HostWidget, KNOWN_WIDGET_TYPES};
