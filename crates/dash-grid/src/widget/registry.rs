//! Type tag to factory mapping

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::error::WidgetError;
use crate::state::WidgetConfig;
use super::{WidgetContext, WidgetInstance};

/// Builds a widget instance from its context and stored config
pub type WidgetFactory =
    Box<dyn Fn(&WidgetContext, &WidgetConfig) -> Result<Box<dyn WidgetInstance>, WidgetError>>;

/// Registry of known widget types
#[derive(Default)]
pub struct WidgetRegistry {
    factories: BTreeMap<String, WidgetFactory>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for a type tag
    pub fn register<F>(&mut self, widget_type: impl Into<String>, factory: F)
    where
        F: Fn(&WidgetContext, &WidgetConfig) -> Result<Box<dyn WidgetInstance>, WidgetError> + 'static,
    {
        self.factories.insert(widget_type.into(), Box::new(factory));
    }

    pub fn contains(&self, widget_type: &str) -> bool {
        self.factories.contains_key(widget_type)
    }

    /// Registered type tags, sorted
    pub fn types(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Instantiate a widget of `widget_type`
    pub fn create(
        &self,
        widget_type: &str,
        ctx: &WidgetContext,
        config: &WidgetConfig,
    ) -> Result<Box<dyn WidgetInstance>, WidgetError> {
        let factory = self
            .factories
            .get(widget_type)
            .ok_or_else(|| WidgetError::UnknownType(widget_type.to_string()))?;

        factory(ctx, config).inspect_err(|error| {
            warn!(widget_id = ctx.widget_id(), %error, "widget construction failed");
        })
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("types", &self.types())
            .finish()
    }
}
