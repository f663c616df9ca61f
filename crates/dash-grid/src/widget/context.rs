//! Config-change channel from a widget to its container

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::state::{WidgetConfig, WidgetId};

/// A widget reported a new configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigChange {
    pub widget_id: WidgetId,
    pub config: WidgetConfig,
}

/// Queue of config changes shared by every mounted widget.
///
/// Changes are drained by the engine outside any widget callback and turned
/// into `update_widget` calls.
#[derive(Clone, Default)]
pub struct ConfigNotifier {
    queue: Rc<RefCell<VecDeque<ConfigChange>>>,
}

impl ConfigNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self, widget_id: &str, config: WidgetConfig) {
        self.queue.borrow_mut().push_back(ConfigChange {
            widget_id: widget_id.to_string(),
            config,
        });
    }

    /// Take every queued change in arrival order
    pub fn drain(&self) -> Vec<ConfigChange> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl fmt::Debug for ConfigNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigNotifier")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Handed to a widget factory; the widget keeps it to report changes
#[derive(Clone, Debug)]
pub struct WidgetContext {
    widget_id: WidgetId,
    notifier: ConfigNotifier,
}

impl WidgetContext {
    pub fn new(widget_id: impl Into<WidgetId>, notifier: ConfigNotifier) -> Self {
        Self {
            widget_id: widget_id.into(),
            notifier,
        }
    }

    #[inline]
    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    /// Report that the user changed this widget's configuration
    pub fn config_changed(&self, config: WidgetConfig) {
        self.notifier.notify(&self.widget_id, config);
    }
}
