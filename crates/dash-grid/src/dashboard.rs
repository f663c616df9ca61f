//! Application context
//!
//! Owns the collaborators and wires them in a fixed order: the store goes
//! into the [`StateManager`], which the [`GridEngine`] then follows.
//! Teardown runs in reverse: the engine stops following state and destroys
//! its widgets, then the state manager flushes any pending save.

use std::rc::Rc;

use tracing::info;

use crate::clock::Clock;
use crate::config::DashboardConfig;
use crate::engine::GridEngine;
use crate::persistence::Storage;
use crate::state::StateManager;
use crate::widget::WidgetRegistry;

/// A running dashboard
pub struct Dashboard {
    engine: GridEngine,
    state: Rc<StateManager>,
    running: bool,
}

impl Dashboard {
    pub fn new(
        storage: Box<dyn Storage>,
        registry: WidgetRegistry,
        clock: Rc<dyn Clock>,
        config: DashboardConfig,
    ) -> Self {
        let state = Rc::new(StateManager::new(storage, Rc::clone(&clock), config));
        let engine = GridEngine::new(Rc::clone(&state), registry, clock);
        info!(outcome = ?state.load_outcome(), "dashboard started");

        Self {
            engine,
            state,
            running: true,
        }
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GridEngine {
        &mut self.engine
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pump deferred work: widget config changes, finished exit
    /// transitions and the debounced save. Returns whether a save ran.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.engine.tick();
        self.state.tick()
    }

    /// Unsubscribe everything, destroy mounted widgets and flush pending
    /// persistence. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.engine.shutdown();
        self.state.shutdown();
        info!("dashboard shut down");
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.shutdown();
    }
}
