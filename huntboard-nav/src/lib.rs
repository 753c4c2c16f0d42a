//! Selection and navigation engine for a recursive drill-down browser.
//!
//! A collection of [`Item`]s is browsed by selecting an item, one of its
//! [`View`]s and optionally one of that view's sub-views. The crate is
//! UI-agnostic and split into layers:
//! - [`SelectionMachine`] owns the selection path and enforces that a
//!   deeper level never outlives its parent;
//! - [`PresentationAdapter`] maps the path to panes (side by side or
//!   paged) and sequences scroll side effects around back navigation;
//! - [`SelectionSync`] keeps the selection aligned with an id owned by an
//!   embedding parent;
//! - [`Browser`] wires them behind one reducer that turns
//!   [`BrowserEvent`]s into [`BrowserEffect`]s.
//!
//! Timers are never started here. Delays are emitted as
//! [`BrowserEffect::Schedule`] and come back as
//! [`BrowserEvent::DeferredElapsed`]; [`DeferredQueue`] is a deterministic
//! clock hosts and tests can use to drive them.
//!
//! # Quick Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use huntboard_nav::{
//!     Browser, BrowserEvent, CollectionContext, DomainConfigs, Item,
//!     LayoutStore, MemoryLayoutStore, SelectionDepth, SyncMode, View,
//! };
//!
//! let store: Rc<RefCell<dyn LayoutStore>> =
//!     Rc::new(RefCell::new(MemoryLayoutStore::new()));
//! let mut browser = Browser::new(
//!     DomainConfigs::default(),
//!     store,
//!     SyncMode::Standalone,
//!     CollectionContext::job_search("search-1"),
//!     1280.0,
//! );
//!
//! browser.mount();
//! let generation = browser.fetch_generation();
//! browser.reduce(BrowserEvent::ItemsLoaded {
//!     generation,
//!     items: vec![
//!         Item::new("job-1", "Rust Engineer")
//!             .with_views(vec![View::new("overview", "Overview")]),
//!     ],
//! });
//!
//! browser.reduce(BrowserEvent::ItemPressed(String::from("job-1")));
//! browser.reduce(BrowserEvent::ViewPressed(String::from("overview")));
//! assert_eq!(browser.machine().depth(), SelectionDepth::View);
//!
//! browser.reduce(BrowserEvent::BackPressed);
//! assert_eq!(browser.machine().depth(), SelectionDepth::Item);
//! ```

mod browser;
mod chat;
mod config;
mod deferred;
mod effect;
mod model;
mod presentation;
mod selection;
mod source;
mod sync;

pub use browser::{Browser, BrowserEvent, LoadStatus};
pub use chat::{
    ChatPanel, ChatRole, ChatStatus, ConversationAttachment,
    ConversationMessage, ConversationThread, thread_to_item,
};
pub use config::{
    BrowserConfig, BrowserLabels, DEFAULT_BREAKPOINT, DomainConfigs,
    NavigationTiming,
};
pub use deferred::{DeferredQueue, DeferredToken};
pub use effect::BrowserEffect;
pub use model::{
    CHAT_VIEW_ID_SUFFIX, CHAT_VIEW_TITLE, Item, MetadataField,
    MetadataSummary, View, find_item, find_sub_view, find_view,
    metadata_summary, thread_id_from_view_id,
};
pub use presentation::{
    DEFAULT_LEFT_PERCENT, DEFAULT_RIGHT_PERCENT, DeferredOutcome,
    JsonLayoutStore, LayoutPlan, LayoutStore, LayoutStoreError, LeavePlan,
    MAX_PANE_PERCENT, MIN_PANE_PERCENT, MemoryLayoutStore, Page, Pane,
    PaneContent, PanelLayout, PanelLayoutState, PresentationAdapter,
    ScrollBehavior, Strategy, default_layouts_path,
};
pub use selection::{
    SelectionDepth, SelectionMachine, SelectionObserver, SelectionPath,
    SelectionState, SelectionTransition,
};
pub use source::{
    CollectionContext, Domain, Job, JobSearch, ViewRecord,
    build_view_hierarchy, sort_newest_first,
};
pub use sync::{SelectionSync, SyncMode, SyncOutcome};
