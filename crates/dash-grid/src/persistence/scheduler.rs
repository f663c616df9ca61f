//! Debounced save timer

/// Single re-armable deadline.
///
/// Every [`arm`](Self::arm) pushes the deadline out to `now + delay`, so a
/// burst of mutations produces one write once the burst goes quiet.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistScheduler {
    delay_ms: f64,
    due_at_ms: Option<f64>,
}

impl PersistScheduler {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            due_at_ms: None,
        }
    }

    /// (Re)start the quiet period
    pub fn arm(&mut self, now_ms: f64) {
        self.due_at_ms = Some(now_ms + self.delay_ms);
    }

    pub fn cancel(&mut self) {
        self.due_at_ms = None;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.due_at_ms.is_some()
    }

    #[inline]
    pub fn due_at(&self) -> Option<f64> {
        self.due_at_ms
    }

    /// Consume the deadline if it has passed
    pub fn take_due(&mut self, now_ms: f64) -> bool {
        match self.due_at_ms {
            Some(due) if now_ms >= due => {
                self.due_at_ms = None;
                true
            }
            _ => false,
        }
    }
}
