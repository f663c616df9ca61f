//! Render tree: the engine's mirror of the widget list
//!
//! Driven entirely by state events. Containers are kept in mount order,
//! later containers paint (and hit test) on top.

use tracing::{debug, warn};

use crate::grid::{GridMetrics, GridSettings};
use crate::math::{ScreenRect, Vec2};
use crate::state::{ApplicationState, StateEvent, StateManager, WidgetId, WidgetRecord};
use crate::widget::{ConfigNotifier, WidgetContext, WidgetRegistry};
use super::container::{ContainerContent, ContainerPhase, WidgetContainer};

/// Container width used until the host reports its viewport
pub const DEFAULT_CONTAINER_WIDTH: f32 = 1200.0;

/// Mounted containers plus the geometry they are laid out in
#[derive(Debug)]
pub struct RenderTree {
    registry: WidgetRegistry,
    notifier: ConfigNotifier,
    containers: Vec<WidgetContainer>,
    grid: GridSettings,
    origin: Vec2,
    width: f32,
    focused: Option<WidgetId>,
    exit_transition_ms: f64,
}

impl RenderTree {
    pub(crate) fn new(registry: WidgetRegistry, grid: GridSettings, exit_transition_ms: f64) -> Self {
        Self {
            registry,
            notifier: ConfigNotifier::new(),
            containers: Vec::new(),
            grid,
            origin: Vec2::ZERO,
            width: DEFAULT_CONTAINER_WIDTH,
            focused: None,
            exit_transition_ms,
        }
    }

    /// Every container, including those still running their exit transition
    pub fn containers(&self) -> &[WidgetContainer] {
        &self.containers
    }

    /// Live (not exiting) container for a widget
    pub fn container(&self, id: &str) -> Option<&WidgetContainer> {
        self.containers
            .iter()
            .find(|c| c.widget_id() == id && !c.is_exiting())
    }

    pub fn metrics(&self) -> GridMetrics {
        GridMetrics::new(&self.grid, self.origin, self.width)
    }

    #[inline]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub(crate) fn notifier(&self) -> &ConfigNotifier {
        &self.notifier
    }

    pub(crate) fn set_focus(&mut self, id: Option<WidgetId>) {
        self.focused = id;
    }

    pub(crate) fn set_viewport(&mut self, origin: Vec2, width: f32) {
        self.origin = origin;
        self.width = width;
    }

    /// Topmost live container under a screen position
    pub fn container_at(&self, pos: Vec2) -> Option<(&WidgetContainer, ScreenRect)> {
        let metrics = self.metrics();
        self.containers
            .iter()
            .rev()
            .filter(|c| !c.is_exiting())
            .map(|c| (c, metrics.grid_to_screen(c.rect())))
            .find(|(_, rect)| rect.contains(pos))
    }

    // =========================================================================
    // State reactions
    // =========================================================================

    /// Mirror one state event
    pub(crate) fn apply_event(&mut self, event: &StateEvent, state: &StateManager, now_ms: f64) {
        match event {
            StateEvent::WidgetAdded { widget } => self.mount(widget),
            StateEvent::WidgetUpdated { widget, .. } => self.update(widget),
            StateEvent::WidgetRemoved { widget } => {
                let animate = state.with_state(|s| s.flag("animations", true));
                self.remove(&widget.id, now_ms, animate);
            }
            StateEvent::GridUpdated { grid, .. } => self.grid = *grid,
            StateEvent::LayoutImported { .. } | StateEvent::LayoutReset | StateEvent::StateLoaded => {
                state.with_state(|s| self.rebuild(s));
            }
            _ => {}
        }
    }

    /// Build a container for a record, replacing any container with that id
    pub(crate) fn mount(&mut self, record: &WidgetRecord) {
        while let Some(index) = self.containers.iter().position(|c| c.widget_id() == record.id) {
            self.containers.remove(index).detach();
        }

        let ctx = WidgetContext::new(record.id.clone(), self.notifier.clone());
        let content = match self.registry.create(&record.widget_type, &ctx, &record.config) {
            Ok(widget) => ContainerContent::Widget(widget),
            Err(error) => {
                warn!(widget_id = %record.id, %error, "rendering widget placeholder");
                ContainerContent::Failed(error)
            }
        };

        debug!(widget_id = %record.id, "container mounted");
        self.containers.push(WidgetContainer::new(record, content));
    }

    pub(crate) fn update(&mut self, record: &WidgetRecord) {
        if let Some(container) = self
            .containers
            .iter_mut()
            .find(|c| c.widget_id() == record.id && !c.is_exiting())
        {
            container.apply_record(record);
        }
    }

    /// Start the exit transition, or detach at once when `animate` is off
    pub(crate) fn remove(&mut self, id: &str, now_ms: f64, animate: bool) {
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }

        let Some(index) = self
            .containers
            .iter()
            .position(|c| c.widget_id() == id && !c.is_exiting())
        else {
            return;
        };

        if animate && self.exit_transition_ms > 0.0 {
            self.containers[index].begin_exit(now_ms + self.exit_transition_ms);
        } else {
            self.containers.remove(index).detach();
        }
    }

    /// Tear everything down and mount the whole widget list again
    pub(crate) fn rebuild(&mut self, state: &ApplicationState) {
        self.detach_all();
        self.grid = state.grid;
        self.focused = None;
        for record in &state.widgets {
            self.mount(record);
        }
        debug!(containers = self.containers.len(), "render tree rebuilt");
    }

    /// Detach containers whose exit transition has finished
    pub(crate) fn sweep(&mut self, now_ms: f64) -> usize {
        let (done, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.containers)
            .into_iter()
            .partition(|c| match c.phase() {
                ContainerPhase::Exiting { detach_at_ms } => now_ms >= detach_at_ms,
                ContainerPhase::Mounted => false,
            });
        self.containers = keep;

        let count = done.len();
        done.into_iter().for_each(WidgetContainer::detach);
        count
    }

    pub(crate) fn detach_all(&mut self) {
        for container in self.containers.drain(..) {
            container.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::state::default_state;
    use crate::widget::testing::{self, Journal};

    fn tree() -> (RenderTree, Rc<RefCell<Journal>>) {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let tree = RenderTree::new(testing::registry(&journal), GridSettings::default(), 200.0);
        (tree, journal)
    }

    fn record(id: &str, widget_type: &str, x: u32) -> WidgetRecord {
        WidgetRecord {
            id: id.into(),
            widget_type: widget_type.into(),
            x,
            y: 0,
            w: 3,
            h: 2,
            minimized: false,
            config: Default::default(),
        }
    }

    #[test]
    fn test_failed_widget_does_not_block_others() {
        let (mut tree, _) = tree();
        tree.mount(&record("broken-1", "broken", 0));
        tree.mount(&record("radar-1", "radar", 3));
        tree.mount(&record("clock-1", "clock", 6));

        assert_eq!(tree.containers().len(), 3);
        assert!(tree.container("broken-1").unwrap().error().is_some());
        assert!(tree.container("radar-1").unwrap().error().is_some());
        assert!(tree.container("clock-1").unwrap().visual().is_some());
    }

    #[test]
    fn test_exit_transition_then_detach() {
        let (mut tree, journal) = tree();
        tree.mount(&record("clock-1", "clock", 0));
        tree.set_focus(Some("clock-1".into()));

        tree.remove("clock-1", 1000.0, true);
        assert!(tree.containers()[0].is_exiting());
        assert!(tree.container("clock-1").is_none());
        assert_eq!(tree.focused(), None);

        assert_eq!(tree.sweep(1100.0), 0);
        assert!(journal.borrow().destroyed.is_empty());
        assert_eq!(tree.sweep(1200.0), 1);
        assert!(tree.containers().is_empty());
        assert_eq!(journal.borrow().destroyed, vec!["clock-1".to_string()]);
    }

    #[test]
    fn test_remove_without_animation_is_immediate() {
        let (mut tree, journal) = tree();
        tree.mount(&record("clock-1", "clock", 0));
        tree.remove("clock-1", 0.0, false);
        assert!(tree.containers().is_empty());
        assert_eq!(journal.borrow().destroyed.len(), 1);
    }

    #[test]
    fn test_remount_replaces_exiting_container() {
        let (mut tree, journal) = tree();
        tree.mount(&record("clock-1", "clock", 0));
        tree.remove("clock-1", 0.0, true);
        tree.mount(&record("clock-1", "clock", 3));

        assert_eq!(tree.containers().len(), 1);
        assert_eq!(tree.container("clock-1").unwrap().rect().x, 3);
        assert_eq!(journal.borrow().destroyed.len(), 1);
    }

    #[test]
    fn test_rebuild_mirrors_state() {
        let (mut tree, journal) = tree();
        tree.mount(&record("clock-1", "clock", 0));
        tree.rebuild(&default_state());

        assert_eq!(tree.containers().len(), 10);
        assert_eq!(journal.borrow().destroyed, vec!["clock-1".to_string()]);
        // unregistered types become placeholders
        assert!(tree.container("weather-1").unwrap().error().is_some());
        assert!(tree.container("notes-1").unwrap().visual().is_some());
    }

    #[test]
    fn test_container_at_prefers_topmost() {
        let (mut tree, _) = tree();
        tree.set_viewport(Vec2::ZERO, 1184.0);
        tree.mount(&record("clock-1", "clock", 0));
        tree.mount(&record("clock-2", "clock", 2));

        let (hit, rect) = tree.container_at(Vec2::new(250.0, 50.0)).unwrap();
        assert_eq!(hit.widget_id(), "clock-2");
        assert!((rect.x - 200.0).abs() < 0.001);
        assert!(tree.container_at(Vec2::new(50.0, 500.0)).is_none());
    }
}
