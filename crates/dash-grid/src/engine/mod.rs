//! Grid interaction engine
//!
//! This module is split into focused submodules:
//! - `tree`: render tree of widget containers, mirrored from state events
//! - `container`: one mounted widget and its serializable view
//! - `input`: pointer handling and the drag/resize gestures
//! - `keyboard`: the focused-widget keyboard path
//! - `event`: interaction events for the surrounding application
//!
//! The engine never mutates [`ApplicationState`] directly. Every commit goes
//! through a named [`StateManager`] operation, and the render tree follows
//! the resulting state events.
//!
//! [`ApplicationState`]: crate::state::ApplicationState

mod container;
mod event;
mod input;
mod keyboard;
mod tree;

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use serde::Serialize;
use tracing::debug;

use crate::clock::Clock;
use crate::events::{BusEvent, EventBus, Subscription, Topic};
use crate::grid::GridMetrics;
use crate::input::{GestureRouter, HitStyle};
use crate::math::{GridRect, ScreenRect, Vec2};
use crate::state::{StateManager, WidgetId, WidgetUpdate};
use crate::widget::WidgetRegistry;

pub use container::{ContainerAction, ContainerContent, ContainerPhase, ContainerView, WidgetContainer};
pub use event::{GridEvent, GridEventKind};
pub use tree::{RenderTree, DEFAULT_CONTAINER_WIDTH};

/// Ghost shown while a gesture is in flight
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub widget_id: WidgetId,
    pub kind: PreviewKind,
    /// Last validated candidate
    pub rect: GridRect,
    pub screen_rect: ScreenRect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Drag,
    Resize,
}

/// Grid engine coordinating rendering and interaction
pub struct GridEngine {
    state: Rc<StateManager>,
    tree: Rc<RefCell<RenderTree>>,
    router: GestureRouter,
    events: EventBus<GridEvent>,
    clock: Rc<dyn Clock>,
    hit_style: HitStyle,
    max_collision_attempts: u32,
    subscription: Option<Subscription>,
}

impl GridEngine {
    /// Mount every widget currently in state and start following state events
    pub fn new(state: Rc<StateManager>, registry: WidgetRegistry, clock: Rc<dyn Clock>) -> Self {
        let config = state.config().clone();
        let mut tree = RenderTree::new(registry, state.with_state(|s| s.grid), config.exit_transition_ms);
        state.with_state(|s| tree.rebuild(s));
        let tree = Rc::new(RefCell::new(tree));

        let subscription = {
            let tree = Rc::clone(&tree);
            let weak: Weak<StateManager> = Rc::downgrade(&state);
            let clock = Rc::clone(&clock);
            state.subscribe(Topic::All, move |event| {
                if let Some(state) = weak.upgrade() {
                    tree.borrow_mut().apply_event(event, &state, clock.now_ms());
                }
            })
        };

        Self {
            state,
            tree,
            router: GestureRouter::new(),
            events: EventBus::new(),
            clock,
            hit_style: HitStyle::from_config(&config),
            max_collision_attempts: config.max_collision_attempts,
            subscription: Some(subscription),
        }
    }

    pub fn state(&self) -> &Rc<StateManager> {
        &self.state
    }

    /// Read access to the render tree
    pub fn tree(&self) -> Ref<'_, RenderTree> {
        self.tree.borrow()
    }

    pub fn metrics(&self) -> GridMetrics {
        self.tree.borrow().metrics()
    }

    /// Report where the grid container sits on screen and how wide it is
    pub fn set_viewport(&mut self, origin: Vec2, width: f32) {
        self.tree.borrow_mut().set_viewport(origin, width);
    }

    /// Views of every container for the host renderer
    pub fn views(&self) -> Vec<ContainerView> {
        let tree = self.tree.borrow();
        let metrics = tree.metrics();
        let focused = tree.focused();
        tree.containers()
            .iter()
            .map(|c| c.view(&metrics, focused == Some(c.widget_id())))
            .collect()
    }

    /// Current gesture ghost, if any
    pub fn preview(&self) -> Option<Preview> {
        let gesture = self.router.gesture()?;
        let rect = gesture.candidate();
        Some(Preview {
            widget_id: gesture.widget_id().to_string(),
            kind: if gesture.is_drag() { PreviewKind::Drag } else { PreviewKind::Resize },
            rect,
            screen_rect: self.metrics().grid_to_screen(rect),
        })
    }

    #[inline]
    pub fn is_interacting(&self) -> bool {
        self.router.is_active()
    }

    // =========================================================================
    // Focus and actions
    // =========================================================================

    /// Give keyboard focus to a live container; `false` if there is none
    pub fn focus(&mut self, id: &str) -> bool {
        let mut tree = self.tree.borrow_mut();
        if tree.container(id).is_none() {
            return false;
        }
        tree.set_focus(Some(id.to_string()));
        true
    }

    pub fn blur(&mut self) {
        self.tree.borrow_mut().set_focus(None);
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.tree.borrow().focused().map(str::to_string)
    }

    /// Run a header button's action
    pub fn trigger_action(&mut self, id: &str, action: ContainerAction) -> bool {
        if self.tree.borrow().container(id).is_none() {
            return false;
        }
        match action {
            ContainerAction::Minimize => self.state.toggle_minimized(id),
            ContainerAction::OpenSettings => {
                self.emit(GridEvent::WidgetSettingsRequested { widget_id: id.to_string() });
                true
            }
        }
    }

    // =========================================================================
    // Events and pumping
    // =========================================================================

    pub fn subscribe(
        &self,
        topic: impl Into<Topic<GridEventKind>>,
        handler: impl Fn(&GridEvent) + 'static,
    ) -> Subscription {
        self.events.subscribe(topic, handler)
    }

    pub(crate) fn emit(&self, event: GridEvent) {
        debug!(topic = event.kind().name(), widget_id = event.widget_id(), "grid event");
        self.events.emit(&event);
    }

    /// Turn queued widget config changes into `update_widget` calls
    pub fn flush_config_changes(&mut self) -> usize {
        let changes = self.tree.borrow().notifier().drain();
        let count = changes.len();
        for change in changes {
            self.state.update_widget(&change.widget_id, WidgetUpdate::config(change.config));
        }
        count
    }

    /// Drain config changes and finish elapsed exit transitions
    pub fn tick(&mut self) {
        self.flush_config_changes();
        let detached = self.tree.borrow_mut().sweep(self.clock.now_ms());
        if detached > 0 {
            debug!(detached, "exit transitions finished");
        }
    }

    /// Stop following state, end any gesture and destroy every widget
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.router.finish();
        self.flush_config_changes();
        self.tree.borrow_mut().detach_all();
        self.events.clear();
    }
}
