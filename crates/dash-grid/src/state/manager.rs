//! State manager: the single trusted store
//!
//! Mutations update the canonical state in place, release the borrow, then
//! publish. Handlers may therefore read state or issue further mutations
//! from inside a dispatch.
//!
//! No collision or bounds validation happens here; that is the grid
//! engine's job. The exceptions are auto-placement (`add_widget` without a
//! position, `duplicate_widget`), which search for a free slot, and
//! `update_grid`, which refits the layout to the new column count.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::DashboardConfig;
use crate::error::{DocumentError, LoadError};
use crate::events::{EventBus, Subscription, Topic};
use crate::grid::{find_empty_position, fit_to_columns, GridUpdate};
use crate::math::GridRect;
use crate::persistence::{
    decode_state, parse_document, LayoutExport, PersistScheduler, PersistedState, Storage, MAX_LAYOUT_ROWS,
};
use super::defaults::default_state;
use super::event::{StateEvent, StateEventKind};
use super::ids::next_widget_id;
use super::model::{ApplicationState, NewWidget, Settings, Theme, WidgetRecord, WidgetUpdate};

/// How the state was obtained at construction
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    /// A prior snapshot was restored
    Restored,
    /// Nothing was stored; the default layout is in use
    Defaulted,
    /// The stored snapshot was unusable; the default layout is in use
    Failed(LoadError),
}

struct Persistence {
    storage: Box<dyn Storage>,
    scheduler: PersistScheduler,
}

/// Owner of the canonical [`ApplicationState`]
pub struct StateManager {
    state: RefCell<ApplicationState>,
    bus: EventBus<StateEvent>,
    persistence: Rc<RefCell<Persistence>>,
    clock: Rc<dyn Clock>,
    config: DashboardConfig,
    load_outcome: RefCell<LoadOutcome>,
    autosave: RefCell<Option<Subscription>>,
}

impl StateManager {
    /// Load the prior snapshot from `storage`, falling back to the default
    /// layout, and start auto-persisting.
    pub fn new(storage: Box<dyn Storage>, clock: Rc<dyn Clock>, config: DashboardConfig) -> Self {
        let (state, outcome) = match read_snapshot(storage.as_ref(), &config.storage_key) {
            Ok(Some(state)) => {
                info!(widgets = state.widgets.len(), "restored saved dashboard");
                (state, LoadOutcome::Restored)
            }
            Ok(None) => {
                info!("no saved dashboard, using default layout");
                (default_state(), LoadOutcome::Defaulted)
            }
            Err(error) => {
                warn!(%error, "saved dashboard unusable, using default layout");
                (default_state(), LoadOutcome::Failed(error))
            }
        };

        let persistence = Rc::new(RefCell::new(Persistence {
            storage,
            scheduler: PersistScheduler::new(config.persist_delay_ms),
        }));

        let manager = Self {
            state: RefCell::new(state),
            bus: EventBus::new(),
            persistence,
            clock,
            config,
            load_outcome: RefCell::new(outcome),
            autosave: RefCell::new(None),
        };

        let persistence = Rc::clone(&manager.persistence);
        let clock = Rc::clone(&manager.clock);
        let autosave = manager.bus.subscribe(Topic::All, move |event: &StateEvent| {
            if event.is_mutation() {
                persistence.borrow_mut().scheduler.arm(clock.now_ms());
            }
        });
        *manager.autosave.borrow_mut() = Some(autosave);

        manager
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Copy of the whole state
    pub fn get_state(&self) -> ApplicationState {
        self.state.borrow().clone()
    }

    /// Copy of one widget record
    pub fn get_widget(&self, id: &str) -> Option<WidgetRecord> {
        self.state.borrow().widget(id).cloned()
    }

    /// Borrow the state read-only without copying.
    ///
    /// The closure must not call back into mutation methods.
    pub fn with_state<R>(&self, f: impl FnOnce(&ApplicationState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome.borrow().clone()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register a handler for one topic or [`Topic::All`]
    pub fn subscribe(
        &self,
        topic: impl Into<Topic<StateEventKind>>,
        handler: impl Fn(&StateEvent) + 'static,
    ) -> Subscription {
        self.bus.subscribe(topic, handler)
    }

    fn emit(&self, event: StateEvent) {
        debug!(topic = event.topic(), "state event");
        self.bus.emit(&event);
    }

    // =========================================================================
    // Widget mutations
    // =========================================================================

    /// Insert a widget, filling in id, defaults and, when no position was
    /// given, the first free slot.
    pub fn add_widget(&self, new: NewWidget) -> WidgetRecord {
        let record = {
            let mut state = self.state.borrow_mut();
            let columns = state.grid.columns;
            let size = GridRect::new(0, 0, new.width(), new.height()).clamp_to_columns(columns);

            let (x, y) = if new.has_position() {
                (new.x.unwrap_or(0), new.y.unwrap_or(0))
            } else {
                find_empty_position(
                    state.widgets.iter().map(WidgetRecord::rect),
                    columns,
                    size.w,
                    size.h,
                    self.config.max_scan_rows,
                )
            };

            let id = next_widget_id(&new.widget_type, state.widgets.iter().map(|w| w.id.as_str()));
            let record = WidgetRecord {
                id,
                widget_type: new.widget_type,
                x,
                y,
                w: size.w,
                h: size.h,
                minimized: new.minimized.unwrap_or(false),
                config: new.config,
            };
            state.widgets.push(record.clone());
            record
        };

        info!(widget_id = %record.id, x = record.x, y = record.y, "widget added");
        self.emit(StateEvent::WidgetAdded { widget: record.clone() });
        record
    }

    /// Merge `updates` into the widget; `false` (and no event) if absent
    pub fn update_widget(&self, id: &str, updates: WidgetUpdate) -> bool {
        let (widget, old) = {
            let mut state = self.state.borrow_mut();
            let Some(record) = state.widget_mut(id) else {
                debug!(widget_id = id, "update for unknown widget ignored");
                return false;
            };
            let old = record.clone();
            updates.apply(record);
            (record.clone(), old)
        };

        self.emit(StateEvent::WidgetUpdated { widget, old, updates });
        true
    }

    pub fn move_widget(&self, id: &str, x: u32, y: u32) -> bool {
        self.update_widget(id, WidgetUpdate::position(x, y))
    }

    pub fn resize_widget(&self, id: &str, w: u32, h: u32) -> bool {
        self.update_widget(id, WidgetUpdate::size(w, h))
    }

    /// Flip the minimized flag
    pub fn toggle_minimized(&self, id: &str) -> bool {
        match self.get_widget(id) {
            Some(widget) => self.update_widget(id, WidgetUpdate::minimized(!widget.minimized)),
            None => false,
        }
    }

    pub fn remove_widget(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            match state.widgets.iter().position(|w| w.id == id) {
                Some(index) => state.widgets.remove(index),
                None => return false,
            }
        };

        info!(widget_id = id, "widget removed");
        self.emit(StateEvent::WidgetRemoved { widget: removed });
        true
    }

    /// Clone a widget to its right, or into the first free slot when the
    /// right-hand spot is off the grid or taken.
    pub fn duplicate_widget(&self, id: &str) -> Option<WidgetRecord> {
        let record = {
            let mut state = self.state.borrow_mut();
            let source = state.widget(id)?.clone();
            let columns = state.grid.columns;

            let beside = source.rect().at(source.x + source.w, source.y);
            let occupied: Vec<GridRect> = state.widgets.iter().map(WidgetRecord::rect).collect();
            let fits = beside.right() <= columns && !occupied.iter().any(|r| r.intersects(beside));

            let (x, y) = if fits {
                (beside.x, beside.y)
            } else {
                find_empty_position(occupied, columns, source.w, source.h, self.config.max_scan_rows)
            };

            let record = WidgetRecord {
                id: next_widget_id(&source.widget_type, state.widgets.iter().map(|w| w.id.as_str())),
                x,
                y,
                ..source
            };
            state.widgets.push(record.clone());
            record
        };

        info!(source = id, widget_id = %record.id, "widget duplicated");
        self.emit(StateEvent::WidgetAdded { widget: record.clone() });
        Some(record)
    }

    // =========================================================================
    // Appearance and settings
    // =========================================================================

    pub fn set_theme(&self, theme: Theme) {
        let old_theme = std::mem::replace(&mut self.state.borrow_mut().theme, theme);
        self.emit(StateEvent::ThemeChanged { theme, old_theme });
    }

    /// Shallow-merge feature flags
    pub fn update_settings(&self, updates: Settings) {
        let settings = {
            let mut state = self.state.borrow_mut();
            state.settings.extend(updates.iter().map(|(k, v)| (k.clone(), *v)));
            state.settings.clone()
        };
        self.emit(StateEvent::SettingsUpdated { settings, updates });
    }

    /// The only mutation path for grid geometry.
    ///
    /// Widgets that no longer fit the column count are pulled inside and
    /// pushed down clear of their neighbours; each one that moves gets its
    /// own `widget-updated` after `grid-updated`.
    pub fn update_grid(&self, update: GridUpdate) {
        let (grid, old, refitted) = {
            let mut state = self.state.borrow_mut();
            let old = state.grid;
            update.apply(&mut state.grid);
            let grid = state.grid;

            let rects: Vec<GridRect> = state.widgets.iter().map(WidgetRecord::rect).collect();
            let fitted = fit_to_columns(&rects, grid.columns, MAX_LAYOUT_ROWS);
            let mut refitted = Vec::new();
            for (record, rect) in state.widgets.iter_mut().zip(fitted) {
                if record.rect() != rect {
                    let before = record.clone();
                    let updates = WidgetUpdate::rect(rect);
                    updates.apply(record);
                    refitted.push((record.clone(), before, updates));
                }
            }
            (grid, old, refitted)
        };

        if !refitted.is_empty() {
            info!(columns = grid.columns, moved = refitted.len(), "layout refitted to grid");
        }
        self.emit(StateEvent::GridUpdated { grid, old });
        for (widget, old, updates) in refitted {
            self.emit(StateEvent::WidgetUpdated { widget, old, updates });
        }
    }

    // =========================================================================
    // Layout import/export
    // =========================================================================

    /// Snapshot for download
    pub fn export_layout(&self) -> LayoutExport {
        let export = LayoutExport::new(&self.state.borrow(), self.clock.now_ms());
        self.emit(StateEvent::LayoutExported { export: export.clone() });
        export
    }

    /// Replace the state with an imported document.
    ///
    /// On any validation failure `import-error` is emitted, `false` is
    /// returned and the state is untouched.
    pub fn import_layout(&self, data: &Value) -> bool {
        match decode_state(data) {
            Ok(imported) => {
                let count = imported.widgets.len();
                let backup = std::mem::replace(&mut *self.state.borrow_mut(), imported);
                info!(widgets = count, "layout imported");
                self.emit(StateEvent::LayoutImported { backup: Box::new(backup) });
                true
            }
            Err(error) => self.reject_import(error),
        }
    }

    /// [`import_layout`](Self::import_layout) from document text
    pub fn import_layout_str(&self, text: &str) -> bool {
        match parse_document(text) {
            Ok(value) => self.import_layout(&value),
            Err(error) => self.reject_import(error),
        }
    }

    fn reject_import(&self, error: DocumentError) -> bool {
        warn!(%error, "layout import rejected");
        self.emit(StateEvent::ImportError { error });
        false
    }

    /// Restore the default layout and persist immediately
    pub fn reset_to_default(&self) {
        *self.state.borrow_mut() = default_state();
        info!("layout reset to default");
        self.emit(StateEvent::LayoutReset);
        self.flush();
    }

    /// Re-read the store. On failure `load-error` is emitted and the
    /// current state is kept.
    pub fn reload(&self) -> bool {
        let result = {
            let persistence = self.persistence.borrow();
            read_snapshot(persistence.storage.as_ref(), &self.config.storage_key)
        };

        match result {
            Ok(Some(state)) => {
                *self.state.borrow_mut() = state;
                *self.load_outcome.borrow_mut() = LoadOutcome::Restored;
                self.emit(StateEvent::StateLoaded);
                true
            }
            Ok(None) => false,
            Err(error) => {
                warn!(%error, "reload failed");
                self.emit(StateEvent::LoadError { error });
                false
            }
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Whether a debounced save is waiting
    pub fn has_pending_save(&self) -> bool {
        self.persistence.borrow().scheduler.is_pending()
    }

    /// Write out the state if the debounce window has elapsed
    pub fn tick(&self) -> bool {
        let due = self.persistence.borrow_mut().scheduler.take_due(self.clock.now_ms());
        if due {
            self.save_now()
        } else {
            false
        }
    }

    /// Cancel any pending debounce and write out the state now
    pub fn flush(&self) -> bool {
        self.persistence.borrow_mut().scheduler.cancel();
        self.save_now()
    }

    fn save_now(&self) -> bool {
        let saved_at = self.clock.now_ms();
        let encoded = PersistedState::new(&self.state.borrow(), saved_at).to_json();

        let result = encoded.and_then(|json| {
            let mut persistence = self.persistence.borrow_mut();
            persistence
                .storage
                .save(&self.config.storage_key, &json)
                .map(|()| json.len())
        });

        match result {
            Ok(bytes) => {
                debug!(bytes, "dashboard saved");
                self.emit(StateEvent::StateSaved { saved_at, bytes });
                true
            }
            Err(error) => {
                warn!(%error, "dashboard save failed");
                self.emit(StateEvent::StorageError { error });
                false
            }
        }
    }

    /// Stop auto-persisting, drop every subscriber and write out pending changes
    pub fn shutdown(&self) {
        if let Some(autosave) = self.autosave.borrow_mut().take() {
            autosave.unsubscribe();
        }
        let pending = self.has_pending_save();
        self.bus.clear();
        if pending {
            self.flush();
        }
    }
}

fn read_snapshot(storage: &dyn Storage, key: &str) -> Result<Option<ApplicationState>, LoadError> {
    let Some(text) = storage.load(key)? else {
        return Ok(None);
    };
    let value = parse_document(&text)?;
    Ok(Some(decode_state(&value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::StorageError;
    use crate::events::BusEvent;
    use crate::persistence::MemoryStorage;
    use serde_json::json;
    use std::cell::Cell;

    const KEY: &str = "dashboard-state";

    fn empty_layout() -> String {
        json!({"widgets": []}).to_string()
    }

    fn manager_with(store: &MemoryStorage, clock: &ManualClock) -> StateManager {
        StateManager::new(Box::new(store.clone()), Rc::new(clock.clone()), DashboardConfig::default())
    }

    fn empty_manager() -> (StateManager, MemoryStorage, ManualClock) {
        let store = MemoryStorage::new();
        store.insert(KEY, &empty_layout());
        let clock = ManualClock::new(0.0);
        (manager_with(&store, &clock), store, clock)
    }

    fn record_events(manager: &StateManager) -> Rc<RefCell<Vec<StateEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let _ = manager.subscribe(Topic::All, move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn save(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded("full".into()))
        }
    }

    #[test]
    fn test_defaults_when_store_empty() {
        let manager = manager_with(&MemoryStorage::new(), &ManualClock::new(0.0));
        assert_eq!(manager.load_outcome(), LoadOutcome::Defaulted);
        assert_eq!(manager.get_state().widgets.len(), 10);
    }

    #[test]
    fn test_corrupt_snapshot_falls_back() {
        let store = MemoryStorage::new();
        store.insert(KEY, "{broken");
        let manager = manager_with(&store, &ManualClock::new(0.0));
        assert!(matches!(manager.load_outcome(), LoadOutcome::Failed(LoadError::Document(_))));
        assert_eq!(manager.get_state(), default_state());
    }

    #[test]
    fn test_snapshot_without_widget_list_falls_back() {
        let store = MemoryStorage::new();
        store.insert(KEY, r#"{"widgets": {"a": 1}}"#);
        let manager = manager_with(&store, &ManualClock::new(0.0));
        assert_eq!(
            manager.load_outcome(),
            LoadOutcome::Failed(LoadError::Document(DocumentError::WidgetsNotList))
        );
    }

    #[test]
    fn test_add_three_widgets_first_fit() {
        let (manager, _, _) = empty_manager();
        let origins: Vec<_> = (0..3)
            .map(|_| {
                let w = manager.add_widget(NewWidget::new("clock").size(3, 2));
                (w.x, w.y)
            })
            .collect();
        assert_eq!(origins, vec![(0, 0), (3, 0), (6, 0)]);
    }

    #[test]
    fn test_add_below_full_row() {
        let (manager, _, _) = empty_manager();
        manager.add_widget(NewWidget::new("quotes").at(0, 0).size(12, 2));
        let w = manager.add_widget(NewWidget::new("clock").size(3, 2));
        assert_eq!((w.x, w.y), (0, 2));
    }

    #[test]
    fn test_add_defaults_and_ids() {
        let (manager, _, _) = empty_manager();
        let events = record_events(&manager);

        let a = manager.add_widget(NewWidget::new("notes"));
        let b = manager.add_widget(NewWidget::new("notes"));
        assert_eq!(a.id, "notes-1");
        assert_eq!(b.id, "notes-2");
        assert_eq!(a.rect(), GridRect::new(0, 0, 3, 2));
        assert!(!a.minimized);

        manager.remove_widget("notes-1");
        let c = manager.add_widget(NewWidget::new("notes"));
        assert_eq!(c.id, "notes-1");

        assert_eq!(events.borrow().iter().filter(|e| e.kind() == StateEventKind::WidgetAdded).count(), 3);
    }

    #[test]
    fn test_add_with_single_axis_skips_search() {
        let (manager, _, _) = empty_manager();
        manager.add_widget(NewWidget::new("a"));
        let mut new = NewWidget::new("b");
        new.y = Some(5);
        let b = manager.add_widget(new);
        assert_eq!((b.x, b.y), (0, 5));
    }

    #[test]
    fn test_update_missing_widget() {
        let (manager, _, _) = empty_manager();
        let events = record_events(&manager);
        assert!(!manager.update_widget("missing-id", WidgetUpdate { x: Some(1), ..Default::default() }));
        assert!(events.borrow().is_empty());
        assert!(!manager.has_pending_save());
    }

    #[test]
    fn test_update_emits_old_and_new() {
        let (manager, _, _) = empty_manager();
        let added = manager.add_widget(NewWidget::new("todo"));
        let events = record_events(&manager);

        assert!(manager.move_widget(&added.id, 4, 1));

        let events = events.borrow();
        match &events[0] {
            StateEvent::WidgetUpdated { widget, old, updates } => {
                assert_eq!((widget.x, widget.y), (4, 1));
                assert_eq!((old.x, old.y), (0, 0));
                assert_eq!(updates, &WidgetUpdate::position(4, 1));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_update_does_not_validate() {
        let (manager, _, _) = empty_manager();
        let a = manager.add_widget(NewWidget::new("a"));
        manager.add_widget(NewWidget::new("b"));
        assert!(manager.move_widget(&a.id, 3, 0));
        assert_eq!(manager.get_widget(&a.id).unwrap().x, 3);
    }

    #[test]
    fn test_returned_state_is_a_copy() {
        let (manager, _, _) = empty_manager();
        manager.add_widget(NewWidget::new("a"));
        let mut copy = manager.get_state();
        copy.widgets.clear();
        copy.theme = Theme::Light;
        assert_eq!(manager.get_state().widgets.len(), 1);
        assert_eq!(manager.get_state().theme, Theme::Dark);
    }

    #[test]
    fn test_toggle_minimized() {
        let (manager, _, _) = empty_manager();
        let a = manager.add_widget(NewWidget::new("a"));
        assert!(manager.toggle_minimized(&a.id));
        assert!(manager.get_widget(&a.id).unwrap().minimized);
        assert!(manager.toggle_minimized(&a.id));
        assert!(!manager.get_widget(&a.id).unwrap().minimized);
        assert!(!manager.toggle_minimized("nope"));
    }

    #[test]
    fn test_remove_widget() {
        let (manager, _, _) = empty_manager();
        let a = manager.add_widget(NewWidget::new("a"));
        let events = record_events(&manager);

        assert!(manager.remove_widget(&a.id));
        assert!(!manager.remove_widget(&a.id));
        assert!(manager.get_state().widgets.is_empty());
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0], StateEvent::WidgetRemoved { widget: a });
    }

    #[test]
    fn test_duplicate_places_right() {
        let (manager, _, _) = empty_manager();
        let a = manager.add_widget(NewWidget::new("clock").size(3, 2).with_config(
            json!({"title": "Home"}).as_object().cloned().unwrap(),
        ));
        let copy = manager.duplicate_widget(&a.id).unwrap();
        assert_eq!(copy.id, "clock-2");
        assert_eq!(copy.rect(), GridRect::new(3, 0, 3, 2));
        assert_eq!(copy.config, a.config);
    }

    #[test]
    fn test_duplicate_at_edge_searches() {
        let (manager, _, _) = empty_manager();
        let a = manager.add_widget(NewWidget::new("clock").at(9, 0).size(3, 2));
        let copy = manager.duplicate_widget(&a.id).unwrap();
        assert_eq!((copy.x, copy.y), (0, 0));
    }

    #[test]
    fn test_duplicate_into_taken_spot_searches() {
        let (manager, _, _) = empty_manager();
        let a = manager.add_widget(NewWidget::new("a").at(0, 0).size(3, 2));
        manager.add_widget(NewWidget::new("b").at(3, 0).size(3, 2));
        let copy = manager.duplicate_widget(&a.id).unwrap();
        assert_eq!((copy.x, copy.y), (6, 0));
        assert!(manager.duplicate_widget("missing").is_none());
    }

    #[test]
    fn test_theme_and_settings() {
        let (manager, _, _) = empty_manager();
        let events = record_events(&manager);

        manager.set_theme(Theme::Amoled);
        manager.update_settings([("compactMode".to_string(), true)].into_iter().collect());

        let state = manager.get_state();
        assert_eq!(state.theme, Theme::Amoled);
        assert!(state.flag("compactMode", false));
        assert!(state.flag("animations", false));

        let events = events.borrow();
        assert_eq!(events[0], StateEvent::ThemeChanged { theme: Theme::Amoled, old_theme: Theme::Dark });
        assert_eq!(events[1].kind(), StateEventKind::SettingsUpdated);
    }

    #[test]
    fn test_update_grid() {
        let (manager, _, _) = empty_manager();
        manager.update_grid(GridUpdate { columns: Some(8), ..Default::default() });
        assert_eq!(manager.get_state().grid.columns, 8);
    }

    #[test]
    fn test_shrinking_columns_refits_widgets() {
        let (manager, _, _) = empty_manager();
        let right = manager.add_widget(NewWidget::new("clock").at(9, 0).size(3, 2));
        let left = manager.add_widget(NewWidget::new("notes").at(0, 0).size(3, 2));
        let wide = manager.add_widget(NewWidget::new("todo").at(0, 2).size(10, 1));
        let events = record_events(&manager);

        manager.update_grid(GridUpdate { columns: Some(6), ..Default::default() });

        let state = manager.get_state();
        let rects: Vec<GridRect> = state.widgets.iter().map(WidgetRecord::rect).collect();
        assert!(rects.iter().all(|r| r.fits_columns(6)));
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
            }
        }
        assert_eq!(manager.get_widget(&left.id).unwrap().rect(), left.rect());
        assert_eq!(manager.get_widget(&right.id).unwrap().rect(), GridRect::new(3, 0, 3, 2));
        assert_eq!(manager.get_widget(&wide.id).unwrap().rect(), GridRect::new(0, 2, 6, 1));

        let kinds: Vec<_> = events.borrow().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            [StateEventKind::GridUpdated, StateEventKind::WidgetUpdated, StateEventKind::WidgetUpdated]
        );
        assert!(manager.has_pending_save());
    }

    #[test]
    fn test_import_rejects_non_list() {
        let (manager, _, _) = empty_manager();
        manager.add_widget(NewWidget::new("a"));
        assert!(manager.flush());
        let before = manager.get_state();
        let events = record_events(&manager);

        assert!(!manager.import_layout(&json!({"widgets": "not-a-list"})));

        assert_eq!(manager.get_state(), before);
        assert_eq!(
            events.borrow()[..],
            [StateEvent::ImportError { error: DocumentError::WidgetsNotList }]
        );
        assert!(!manager.has_pending_save());
    }

    #[test]
    fn test_import_malformed_text() {
        let (manager, _, _) = empty_manager();
        assert!(!manager.import_layout_str("not json"));
    }

    #[test]
    fn test_import_far_rows_keeps_add_working() {
        let (manager, _, _) = empty_manager();
        let events = record_events(&manager);

        assert!(!manager.import_layout(&json!({"widgets": [{"type": "a", "y": u32::MAX}]})));
        assert!(matches!(
            events.borrow()[0],
            StateEvent::ImportError { error: DocumentError::InvalidWidget { index: 0, .. } }
        ));

        let added = manager.add_widget(NewWidget::new("b"));
        assert_eq!((added.x, added.y), (0, 0));

        let far = manager.add_widget(NewWidget::new("c").at(0, u32::MAX).size(3, 2));
        assert_eq!(far.rect().bottom(), u32::MAX);
        let next = manager.add_widget(NewWidget::new("d"));
        assert_eq!((next.x, next.y), (3, 0));
    }

    #[test]
    fn test_export_import_round_trip() {
        let (manager, _, clock) = empty_manager();
        manager.add_widget(NewWidget::new("clock"));
        manager.add_widget(NewWidget::new("notes").size(4, 3));
        manager.set_theme(Theme::Light);
        clock.set(42.0);

        let export = manager.export_layout();
        assert!((export.exported_at - 42.0).abs() < 0.001);
        let before = manager.get_state();

        manager.reset_to_default();
        assert!(manager.import_layout(&export.to_value().unwrap()));
        assert_eq!(manager.get_state(), before);
    }

    #[test]
    fn test_import_emits_backup_and_backfills() {
        let (manager, _, _) = empty_manager();
        let original = manager.add_widget(NewWidget::new("a"));
        let events = record_events(&manager);

        assert!(manager.import_layout(&json!({"widgets": [{"type": "todo"}, {"type": "todo"}]})));

        let ids: Vec<_> = manager.get_state().widgets.into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["todo-1", "todo-2"]);
        let events = events.borrow();
        match &events[0] {
            StateEvent::LayoutImported { backup } => assert_eq!(backup.widgets, vec![original]),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_debounced_save_coalesces() {
        let (manager, store, clock) = empty_manager();

        manager.add_widget(NewWidget::new("a"));
        clock.advance(300.0);
        manager.add_widget(NewWidget::new("b"));
        clock.advance(300.0);
        assert!(!manager.tick());
        assert_eq!(store.write_count(), 0);

        clock.advance(200.0);
        assert!(manager.tick());
        assert_eq!(store.write_count(), 1);

        let saved: Value = serde_json::from_str(&store.get(KEY).unwrap()).unwrap();
        assert_eq!(saved["widgets"].as_array().unwrap().len(), 2);
        assert_eq!(saved["savedAt"], json!(800.0));
    }

    #[test]
    fn test_reset_persists_immediately() {
        let (manager, store, _) = empty_manager();
        let events = record_events(&manager);
        manager.reset_to_default();

        assert_eq!(store.write_count(), 1);
        assert!(!manager.has_pending_save());
        assert_eq!(events.borrow()[0], StateEvent::LayoutReset);
    }

    #[test]
    fn test_storage_failure_is_an_event() {
        let clock = ManualClock::new(0.0);
        let manager = StateManager::new(Box::new(FailingStorage), Rc::new(clock), DashboardConfig::default());
        let failures = Rc::new(Cell::new(0));
        let f = Rc::clone(&failures);
        let _ = manager.subscribe(StateEventKind::StorageError, move |_| f.set(f.get() + 1));

        manager.add_widget(NewWidget::new("a"));
        assert!(!manager.flush());

        assert_eq!(failures.get(), 1);
        assert_eq!(manager.get_state().widgets.len(), 11);
    }

    #[test]
    fn test_reload() {
        let (manager, store, _) = empty_manager();
        manager.add_widget(NewWidget::new("a"));
        manager.flush();
        manager.remove_widget("a-1");

        assert!(manager.reload());
        assert_eq!(manager.get_state().widgets.len(), 1);

        store.insert(KEY, "[]");
        let events = record_events(&manager);
        assert!(!manager.reload());
        assert_eq!(manager.get_state().widgets.len(), 1);
        assert_eq!(events.borrow()[0].kind(), StateEventKind::LoadError);
    }

    #[test]
    fn test_handler_can_mutate_during_dispatch() {
        let (manager, _, _) = empty_manager();
        let manager = Rc::new(manager);
        let weak = Rc::downgrade(&manager);
        let _ = manager.subscribe(StateEventKind::WidgetAdded, move |e| {
            if let (Some(m), StateEvent::WidgetAdded { widget }) = (weak.upgrade(), e) {
                if !widget.minimized {
                    m.toggle_minimized(&widget.id);
                }
            }
        });
        let a = manager.add_widget(NewWidget::new("a"));
        assert!(manager.get_widget(&a.id).unwrap().minimized);
    }

    #[test]
    fn test_shutdown_flushes_pending() {
        let (manager, store, _) = empty_manager();
        manager.add_widget(NewWidget::new("a"));
        manager.shutdown();
        assert_eq!(store.write_count(), 1);

        manager.add_widget(NewWidget::new("b"));
        assert!(!manager.has_pending_save());
    }
}
