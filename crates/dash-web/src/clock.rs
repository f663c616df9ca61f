//! `Date.now()` clock

use dash_grid::Clock;

/// Wall clock read from the JavaScript `Date`
#[derive(Clone, Copy, Debug, Default)]
pub struct DateClock;

impl Clock for DateClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}
