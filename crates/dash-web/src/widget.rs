//! Host widgets
//!
//! The page paints widget content itself; the Rust side holds the config
//! and hands the page a [`HostVisual`] naming what to paint. Config edits
//! made in the page come back through the widget's [`WidgetContext`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use dash_grid::{VisualHandle, WidgetConfig, WidgetContext, WidgetId, WidgetInstance, WidgetRegistry};
use serde::Serialize;

/// Widget types the page knows how to paint
pub const KNOWN_WIDGET_TYPES: [&str; 10] = [
    "clock", "weather", "quotes", "notes", "todo", "pomodoro", "calendar", "stocks", "links", "system",
];

/// What the page paints into a container
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostVisual {
    pub widget_id: WidgetId,
    pub widget_type: String,
}

/// Contexts of the mounted host widgets, by widget id
#[derive(Clone, Debug, Default)]
pub struct HostContexts {
    entries: Rc<RefCell<HashMap<WidgetId, (u64, WidgetContext)>>>,
    next_token: Rc<Cell<u64>>,
}

impl HostContexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context of the live widget with `id`
    pub fn get(&self, id: &str) -> Option<WidgetContext> {
        self.entries.borrow().get(id).map(|(_, ctx)| ctx.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, ctx: &WidgetContext) -> u64 {
        let token = self.next_token.get();
        self.next_token.set(token + 1);
        self.entries
            .borrow_mut()
            .insert(ctx.widget_id().to_string(), (token, ctx.clone()));
        token
    }

    /// Drop the entry for `id` unless a newer widget replaced it
    fn release(&self, id: &str, token: u64) {
        let mut entries = self.entries.borrow_mut();
        if entries.get(id).is_some_and(|(current, _)| *current == token) {
            entries.remove(id);
        }
    }
}

pub struct HostWidget {
    visual: Rc<HostVisual>,
    config: WidgetConfig,
    contexts: HostContexts,
    token: u64,
}

impl HostWidget {
    pub fn new(widget_type: &str, ctx: &WidgetContext, config: &WidgetConfig, contexts: HostContexts) -> Self {
        let token = contexts.insert(ctx);
        Self {
            visual: Rc::new(HostVisual {
                widget_id: ctx.widget_id().to_string(),
                widget_type: widget_type.to_string(),
            }),
            config: config.clone(),
            contexts,
            token,
        }
    }
}

impl WidgetInstance for HostWidget {
    fn visual(&self) -> VisualHandle {
        self.visual.clone()
    }

    fn config(&self) -> WidgetConfig {
        self.config.clone()
    }

    fn set_config(&mut self, config: WidgetConfig) {
        self.config = config;
    }

    fn destroy(&mut self) {
        self.contexts.release(&self.visual.widget_id, self.token);
    }
}

/// Registry with a host factory for every known type
pub fn host_registry(contexts: &HostContexts) -> WidgetRegistry {
    let mut registry = WidgetRegistry::new();
    for widget_type in KNOWN_WIDGET_TYPES {
        let contexts = contexts.clone();
        registry.register(widget_type, move |ctx, config| {
            Ok(Box::new(HostWidget::new(widget_type, ctx, config, contexts.clone())) as Box<dyn WidgetInstance>)
        });
    }
    registry
}
