use serde::{Deserialize, Serialize};

use super::storage::LayoutStore;

pub const DEFAULT_LEFT_PERCENT: f32 = 30.0;
pub const DEFAULT_RIGHT_PERCENT: f32 = 25.0;
pub const MIN_PANE_PERCENT: f32 = 20.0;
pub const MAX_PANE_PERCENT: f32 = 40.0;

/// Widths (percent of the viewport) of the resizable side panes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelLayout {
    pub left: f32,
    pub right: f32,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            left: DEFAULT_LEFT_PERCENT,
            right: DEFAULT_RIGHT_PERCENT,
        }
    }
}

impl PanelLayout {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Width left for the item pane given whether the view pane is shown.
    pub fn middle(&self, view_pane_visible: bool) -> f32 {
        let right = if view_pane_visible { self.right } else { 0.0 };
        (100.0 - self.left - right).max(0.0)
    }
}

fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        return MIN_PANE_PERCENT;
    }

    value.clamp(MIN_PANE_PERCENT, MAX_PANE_PERCENT)
}

/// Panel widths of one browser instance plus their persistence.
///
/// Loaded values are honored as stored, even outside the interactive range;
/// only resizes are clamped. A failing store degrades the session to
/// in-memory widths.
pub struct PanelLayoutState {
    key: String,
    layout: PanelLayout,
    store: Box<dyn LayoutStore>,
    persistent: bool,
}

impl std::fmt::Debug for PanelLayoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelLayoutState")
            .field("key", &self.key)
            .field("layout", &self.layout)
            .field("persistent", &self.persistent)
            .finish()
    }
}

impl PanelLayoutState {
    pub fn load(key: impl Into<String>, store: Box<dyn LayoutStore>) -> Self {
        let key = key.into();
        let (layout, persistent) = match store.load(&key) {
            Ok(Some(layout)) => (layout, true),
            Ok(None) => (PanelLayout::default(), true),
            Err(err) => {
                log::warn!(
                    "panel layout for {key} unavailable, using defaults: {err}"
                );
                (PanelLayout::default(), false)
            },
        };

        Self {
            key,
            layout,
            store,
            persistent,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn layout(&self) -> PanelLayout {
        self.layout
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Resize the list pane. Returns whether the width changed.
    pub fn resize_left(&mut self, percent: f32) -> bool {
        let left = clamp_percent(percent);
        self.update(PanelLayout::new(left, self.layout.right))
    }

    /// Resize the view pane. Returns whether the width changed.
    pub fn resize_right(&mut self, percent: f32) -> bool {
        let right = clamp_percent(percent);
        self.update(PanelLayout::new(self.layout.left, right))
    }

    fn update(&mut self, layout: PanelLayout) -> bool {
        if layout == self.layout {
            return false;
        }

        self.layout = layout;
        self.persist();
        true
    }

    fn persist(&mut self) {
        if !self.persistent {
            return;
        }

        if let Err(err) = self.store.save(&self.key, self.layout) {
            log::warn!(
                "panel layout for {} kept in memory only: {err}",
                self.key
            );
            self.persistent = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::{PanelLayout, PanelLayoutState};
    use crate::presentation::errors::LayoutStoreError;
    use crate::presentation::storage::{LayoutStore, MemoryLayoutStore};

    struct FailingStore {
        fail_load: bool,
        saves: Rc<Cell<usize>>,
    }

    impl LayoutStore for FailingStore {
        fn load(
            &self,
            _key: &str,
        ) -> Result<Option<PanelLayout>, LayoutStoreError> {
            if self.fail_load {
                return Err(LayoutStoreError::Unavailable);
            }
            Ok(None)
        }

        fn save(
            &mut self,
            _key: &str,
            _layout: PanelLayout,
        ) -> Result<(), LayoutStoreError> {
            self.saves.set(self.saves.get() + 1);
            Err(LayoutStoreError::Unavailable)
        }
    }

    #[test]
    fn given_empty_store_when_loaded_then_defaults_apply() {
        let state = PanelLayoutState::load(
            "job-browser-panels",
            Box::new(MemoryLayoutStore::new()),
        );

        assert_eq!(state.layout(), PanelLayout::new(30.0, 25.0));
        assert!(state.is_persistent());
    }

    #[test]
    fn given_out_of_range_stored_layout_when_loaded_then_it_is_honored() {
        let mut store = MemoryLayoutStore::new();
        store
            .save("k", PanelLayout::new(55.0, 10.0))
            .expect("memory save should succeed");

        let mut state = PanelLayoutState::load("k", Box::new(store));
        assert_eq!(state.layout(), PanelLayout::new(55.0, 10.0));

        assert!(state.resize_left(60.0));
        assert_eq!(state.layout(), PanelLayout::new(40.0, 10.0));
    }

    #[test]
    fn given_resize_when_applied_then_value_is_clamped_and_persisted() {
        let shared = Rc::new(RefCell::new(MemoryLayoutStore::new()));
        let mut state =
            PanelLayoutState::load("k", Box::new(Rc::clone(&shared)));

        assert!(state.resize_right(5.0));
        assert!(!state.resize_right(12.0));

        assert_eq!(state.layout().right, 20.0);
        assert_eq!(
            shared.borrow().get("k"),
            Some(PanelLayout::new(30.0, 20.0))
        );
    }

    #[test]
    fn given_two_keys_on_one_store_when_resized_then_they_stay_independent() {
        let shared = Rc::new(RefCell::new(MemoryLayoutStore::new()));
        let mut jobs =
            PanelLayoutState::load("jobs", Box::new(Rc::clone(&shared)));
        let mut threads =
            PanelLayoutState::load("threads", Box::new(Rc::clone(&shared)));

        jobs.resize_left(35.0);
        threads.resize_left(22.0);

        assert_eq!(shared.borrow().get("jobs").map(|l| l.left), Some(35.0));
        assert_eq!(shared.borrow().get("threads").map(|l| l.left), Some(22.0));
    }

    #[test]
    fn given_unavailable_store_when_loaded_then_session_stays_in_memory() {
        let saves = Rc::new(Cell::new(0));
        let mut state = PanelLayoutState::load(
            "k",
            Box::new(FailingStore {
                fail_load: true,
                saves: Rc::clone(&saves),
            }),
        );

        assert!(!state.is_persistent());
        assert!(state.resize_left(33.0));
        assert_eq!(state.layout().left, 33.0);
        assert_eq!(saves.get(), 0);
    }

    #[test]
    fn given_failing_save_when_resizing_twice_then_store_is_tried_once() {
        let saves = Rc::new(Cell::new(0));
        let mut state = PanelLayoutState::load(
            "k",
            Box::new(FailingStore {
                fail_load: false,
                saves: Rc::clone(&saves),
            }),
        );

        state.resize_left(33.0);
        state.resize_left(34.0);

        assert_eq!(state.layout().left, 34.0);
        assert_eq!(saves.get(), 1);
        assert!(!state.is_persistent());
    }

    #[test]
    fn given_view_pane_visibility_when_sizing_middle_then_remainder_is_used() {
        let layout = PanelLayout::default();

        assert_eq!(layout.middle(false), 70.0);
        assert_eq!(layout.middle(true), 45.0);
    }
}
