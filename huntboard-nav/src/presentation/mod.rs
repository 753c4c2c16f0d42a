mod errors;
mod feature;
mod layout;
mod model;
mod storage;

pub use errors::LayoutStoreError;
pub use feature::{DeferredOutcome, LeavePlan, PresentationAdapter};
pub use layout::{
    DEFAULT_LEFT_PERCENT, DEFAULT_RIGHT_PERCENT, MAX_PANE_PERCENT,
    MIN_PANE_PERCENT, PanelLayout, PanelLayoutState,
};
pub use model::{
    LayoutPlan, Page, Pane, PaneContent, ScrollBehavior, Strategy,
};
pub use storage::{
    JsonLayoutStore, LayoutStore, MemoryLayoutStore, default_layouts_path,
};
