use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use huntboard_nav::{
    Browser, BrowserEffect, BrowserEvent, CollectionContext, DeferredQueue,
    Domain, DomainConfigs, Item, JsonLayoutStore, LayoutStore,
    LayoutStoreError, MemoryLayoutStore, Page, PaneContent, PanelLayout,
    ScrollBehavior, SelectionDepth, SelectionMachine, SelectionState,
    SyncMode, View,
};

const NARROW: f32 = 390.0;
const WIDE: f32 = 1280.0;

/// Browser plus the virtual clock that delivers its deferred tokens.
struct Harness {
    browser: Browser,
    clock: DeferredQueue,
}

impl Harness {
    fn new(mode: SyncMode, width: f32, items: Vec<Item>) -> Self {
        let store: Rc<RefCell<dyn LayoutStore>> =
            Rc::new(RefCell::new(MemoryLayoutStore::new()));
        Self::with_store(store, mode, width, items)
    }

    fn with_store(
        store: Rc<RefCell<dyn LayoutStore>>,
        mode: SyncMode,
        width: f32,
        items: Vec<Item>,
    ) -> Self {
        let browser = Browser::new(
            DomainConfigs::default(),
            store,
            mode,
            CollectionContext::job_search("search-1"),
            width,
        );
        let mut harness = Self {
            browser,
            clock: DeferredQueue::new(),
        };

        let mounted = harness.browser.mount();
        harness.clock.absorb(&mounted);
        harness.send(BrowserEvent::ItemsLoaded {
            generation: harness.browser.fetch_generation(),
            items,
        });
        harness
    }

    fn send(&mut self, event: BrowserEvent) -> Vec<BrowserEffect> {
        let effects = self.browser.reduce(event);
        self.clock.absorb(&effects);
        effects
    }

    fn press(&mut self, event: BrowserEvent) -> Vec<BrowserEffect> {
        self.send(event)
    }

    /// Advance the clock and deliver every token that became due.
    fn wait(&mut self, millis: u64) -> Vec<BrowserEffect> {
        let mut effects = Vec::new();
        for token in self.clock.advance(Duration::from_millis(millis)) {
            effects.extend(self.send(BrowserEvent::DeferredElapsed { token }));
        }
        effects
    }

    fn depth(&self) -> SelectionDepth {
        self.browser.machine().depth()
    }
}

fn job_items() -> Vec<Item> {
    vec![
        Item::new("1", "A").with_views(vec![
            View::new("1-1", "Info")
                .with_sub_views(vec![View::new("1-1-1", "Contacts")]),
            View::new("1-2", "Notes"),
        ]),
        Item::new("2", "B"),
    ]
}

fn item_pressed(id: &str) -> BrowserEvent {
    BrowserEvent::ItemPressed(id.to_string())
}

fn view_pressed(id: &str) -> BrowserEvent {
    BrowserEvent::ViewPressed(id.to_string())
}

fn sub_view_pressed(id: &str) -> BrowserEvent {
    BrowserEvent::SubViewPressed(id.to_string())
}

fn test_temp_dir(test_name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "huntboard-scenarios-{test_name}-{stamp}-{}",
        std::process::id()
    ));

    fs::create_dir_all(&dir).expect("temporary directory should be created");
    dir
}

#[test]
fn given_single_item_when_drilling_and_going_back_then_view_is_cleared() {
    let mut machine = SelectionMachine::with_items(vec![
        Item::new("1", "A").with_views(vec![View::new("1-1", "Info")]),
    ]);

    machine.select_item(Some("1"));
    assert!(matches!(
        machine.state(),
        SelectionState::ItemSelected { item } if item.id == "1"
    ));

    machine.select_view(Some("1-1"));
    assert!(matches!(
        machine.state(),
        SelectionState::ViewSelected { item, view }
            if item.id == "1" && view.id == "1-1"
    ));

    machine.go_back_one_level();
    assert!(matches!(
        machine.state(),
        SelectionState::ItemSelected { item } if item.id == "1"
    ));
    assert_eq!(machine.path().view_id(), None);
}

#[test]
fn given_unknown_external_id_when_items_later_contain_it_then_it_resolves() {
    let mut harness = Harness::new(
        SyncMode::Controlled,
        WIDE,
        vec![Item::new("1", "A"), Item::new("2", "B")],
    );

    harness.send(BrowserEvent::ExternalIdChanged {
        domain: Domain::Jobs,
        id: Some(String::from("X")),
    });
    assert_eq!(harness.browser.machine().selected_item(), None);

    let refresh = harness.send(BrowserEvent::Refresh);
    let generation = refresh
        .iter()
        .find_map(|effect| match effect {
            BrowserEffect::FetchItems { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("refresh should fetch items");
    harness.send(BrowserEvent::ItemsLoaded {
        generation,
        items: vec![Item::new("1", "A"), Item::new("X", "Found")],
    });

    let selected = harness
        .browser
        .machine()
        .selected_item()
        .expect("external id should resolve once present");
    assert_eq!(selected.id, "X");
}

#[test]
fn given_selected_item_deleted_when_rendered_then_list_and_prompt_show() {
    let mut harness = Harness::new(SyncMode::Standalone, WIDE, job_items());
    harness.press(item_pressed("2"));

    let effects = harness.send(BrowserEvent::ItemDeleted {
        id: String::from("2"),
    });
    harness.send(BrowserEvent::ItemsLoaded {
        generation: harness.browser.fetch_generation(),
        items: vec![Item::new("1", "A")],
    });

    assert!(
        effects
            .iter()
            .any(|effect| matches!(effect, BrowserEffect::FetchItems { .. }))
    );
    assert_eq!(harness.depth(), SelectionDepth::Empty);
    let plan = harness.browser.plan();
    assert_eq!(
        plan.panes[0].content,
        PaneContent::List {
            selected_item_id: None
        }
    );
    assert_eq!(plan.panes[1].content, PaneContent::EmptyPrompt);
}

#[test]
fn given_refetch_with_same_ids_when_loaded_then_deep_selection_survives() {
    let mut harness = Harness::new(SyncMode::Standalone, WIDE, job_items());
    harness.press(item_pressed("1"));
    harness.press(view_pressed("1-1"));
    harness.press(sub_view_pressed("1-1-1"));

    harness.send(BrowserEvent::Refresh);
    harness.send(BrowserEvent::ItemsLoaded {
        generation: harness.browser.fetch_generation(),
        items: job_items(),
    });

    assert_eq!(harness.depth(), SelectionDepth::SubView);
    assert_eq!(harness.browser.machine().path().sub_view_id(), Some("1-1-1"));
}

#[test]
fn given_new_job_search_when_switched_then_selection_resets_and_skip_rearms() {
    let mut harness = Harness::new(SyncMode::Standalone, NARROW, job_items());
    harness.press(item_pressed("1"));
    harness.press(view_pressed("1-1"));

    harness.send(BrowserEvent::CollectionChanged(
        CollectionContext::job_search("search-2"),
    ));

    assert_eq!(harness.depth(), SelectionDepth::Empty);
    assert!(harness.browser.adapter().is_skip_armed());

    harness.send(BrowserEvent::ItemsLoaded {
        generation: harness.browser.fetch_generation(),
        items: job_items(),
    });
    let first = harness.press(item_pressed("2"));
    assert!(first.contains(&BrowserEffect::ScrollTo {
        page: Page::ItemDetail,
        behavior: ScrollBehavior::Smooth,
    }));
}

#[test]
fn given_paged_item_when_back_to_list_then_clear_and_snap_follow_the_timeline()
{
    let mut harness = Harness::new(SyncMode::Standalone, NARROW, job_items());
    harness.press(item_pressed("1"));

    let start = harness.press(BrowserEvent::BackToList);
    assert_eq!(
        &start[..2],
        &[
            BrowserEffect::ScrollTo {
                page: Page::List,
                behavior: ScrollBehavior::Smooth,
            },
            BrowserEffect::SetSnapEnabled(false),
        ]
    );
    assert_eq!(harness.depth(), SelectionDepth::Item);

    let cleared = harness.wait(100);
    assert_eq!(harness.depth(), SelectionDepth::Empty);
    assert!(cleared.is_empty());
    assert!(harness.browser.adapter().is_returning_to_list());

    let released = harness.wait(500);
    assert_eq!(released, vec![BrowserEffect::SetSnapEnabled(true)]);
    assert!(!harness.browser.adapter().is_returning_to_list());
    assert!(harness.clock.is_empty());
}

#[test]
fn given_paged_back_in_flight_when_user_drills_again_then_selection_stands() {
    let mut harness = Harness::new(SyncMode::Standalone, NARROW, job_items());
    harness.press(item_pressed("1"));
    harness.press(view_pressed("1-1"));

    harness.press(BrowserEvent::BackPressed);
    harness.wait(150);
    harness.press(view_pressed("1-2"));
    harness.wait(1_000);

    assert_eq!(harness.depth(), SelectionDepth::View);
    assert_eq!(harness.browser.machine().path().view_id(), Some("1-2"));
}

#[test]
fn given_paged_sub_view_when_back_pressed_twice_then_both_levels_clear() {
    let mut harness = Harness::new(SyncMode::Standalone, NARROW, job_items());
    harness.press(item_pressed("1"));
    harness.press(view_pressed("1-1"));
    harness.press(sub_view_pressed("1-1-1"));

    harness.press(BrowserEvent::BackPressed);
    let second = harness.press(BrowserEvent::BackPressed);
    harness.wait(300);

    assert!(second.contains(&BrowserEffect::ScrollTo {
        page: Page::ItemDetail,
        behavior: ScrollBehavior::Smooth,
    }));
    assert_eq!(harness.depth(), SelectionDepth::Item);
}

#[test]
fn given_wide_viewport_when_back_pressed_then_level_clears_immediately() {
    let mut harness = Harness::new(SyncMode::Standalone, WIDE, job_items());
    harness.press(item_pressed("1"));
    harness.press(view_pressed("1-1"));

    let effects = harness.press(BrowserEvent::BackPressed);

    assert!(effects.is_empty());
    assert_eq!(harness.depth(), SelectionDepth::Item);
    assert!(harness.clock.is_empty());
}

#[test]
fn given_both_external_ids_when_set_then_active_domain_wins() {
    let mut harness = Harness::new(SyncMode::Controlled, WIDE, job_items());

    harness.send(BrowserEvent::ExternalIdChanged {
        domain: Domain::Threads,
        id: Some(String::from("t1")),
    });
    harness.send(BrowserEvent::ExternalIdChanged {
        domain: Domain::Jobs,
        id: Some(String::from("1")),
    });
    assert_eq!(harness.browser.machine().path().item_id(), Some("1"));

    let switched = harness.send(BrowserEvent::CollectionChanged(
        CollectionContext::threads(),
    ));
    assert!(switched.contains(&BrowserEffect::PublishSelectedId {
        domain: Domain::Jobs,
        id: None,
    }));

    harness.send(BrowserEvent::ItemsLoaded {
        generation: harness.browser.fetch_generation(),
        items: vec![Item::new("t1", "Acme"), Item::new("t2", "Globex")],
    });
    assert_eq!(harness.browser.machine().path().item_id(), Some("t1"));
    assert_eq!(harness.browser.sync().external_id(Domain::Jobs), None);
}

#[test]
fn given_resized_panes_when_reopened_then_widths_come_back_from_disk() {
    let root = test_temp_dir("reopen");
    let path = root.join("layouts.json");

    {
        let store: Rc<RefCell<dyn LayoutStore>> =
            Rc::new(RefCell::new(JsonLayoutStore::new(&path)));
        let mut harness =
            Harness::with_store(store, SyncMode::Standalone, WIDE, job_items());
        harness.send(BrowserEvent::LeftPaneResized(36.0));
        harness.send(BrowserEvent::RightPaneResized(90.0));
    }

    let store: Rc<RefCell<dyn LayoutStore>> =
        Rc::new(RefCell::new(JsonLayoutStore::new(&path)));
    let harness =
        Harness::with_store(store, SyncMode::Standalone, WIDE, job_items());

    assert_eq!(
        harness.browser.adapter().layout().layout(),
        PanelLayout::new(36.0, 40.0)
    );

    fs::remove_dir_all(&root).expect("temporary directory should be removed");
}

struct UnavailableStore;

impl LayoutStore for UnavailableStore {
    fn load(
        &self,
        _key: &str,
    ) -> Result<Option<PanelLayout>, LayoutStoreError> {
        Err(LayoutStoreError::Unavailable)
    }

    fn save(
        &mut self,
        _key: &str,
        _layout: PanelLayout,
    ) -> Result<(), LayoutStoreError> {
        Err(LayoutStoreError::Unavailable)
    }
}

#[test]
fn given_unavailable_storage_when_resizing_then_session_keeps_widths() {
    let store: Rc<RefCell<dyn LayoutStore>> =
        Rc::new(RefCell::new(UnavailableStore));
    let mut harness =
        Harness::with_store(store, SyncMode::Standalone, WIDE, job_items());

    let effects = harness.send(BrowserEvent::LeftPaneResized(25.0));

    assert!(!harness.browser.adapter().layout().is_persistent());
    assert_eq!(
        effects,
        vec![BrowserEffect::LayoutChanged {
            left: 25.0,
            right: 25.0,
        }]
    );
}
