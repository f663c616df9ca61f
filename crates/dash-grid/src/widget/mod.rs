//! Widget host adapter
//!
//! The grid only ever sees a widget through [`WidgetInstance`]. Concrete
//! widget types are resolved at runtime from their type tag by a
//! [`WidgetRegistry`].

mod context;
mod registry;

pub use context::{ConfigChange, ConfigNotifier, WidgetContext};
pub use registry::{WidgetFactory, WidgetRegistry};

use std::any::Any;
use std::rc::Rc;

use crate::state::WidgetConfig;

/// Opaque handle to whatever a widget renders into
///
/// The host downcasts it back to its own visual type.
pub type VisualHandle = Rc<dyn Any>;

/// A live widget mounted in a container
pub trait WidgetInstance {
    /// The widget's visual tree
    fn visual(&self) -> VisualHandle;

    /// Current configuration as the widget sees it
    fn config(&self) -> WidgetConfig;

    /// Push a new configuration from the store
    fn set_config(&mut self, config: WidgetConfig);

    /// Release resources; called once when the container detaches
    fn destroy(&mut self);
}
