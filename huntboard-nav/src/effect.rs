use std::time::Duration;

use crate::deferred::DeferredToken;
use crate::presentation::{Page, ScrollBehavior};
use crate::source::{CollectionContext, Domain};

/// Side effect requested by the browser. Hosts perform them in order.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEffect {
    /// Bring a page of the paged strip into view.
    ScrollTo {
        page: Page,
        behavior: ScrollBehavior,
    },
    /// Toggle snap-to-page scrolling of the paged strip.
    SetSnapEnabled(bool),
    /// Deliver `BrowserEvent::DeferredElapsed { token }` after `after`.
    Schedule {
        token: DeferredToken,
        after: Duration,
    },
    /// Drop a previously scheduled token.
    Cancel {
        token: DeferredToken,
    },
    /// Tell the external owner which item id should be selected.
    PublishSelectedId {
        domain: Domain,
        id: Option<String>,
    },
    /// Persisted panel widths changed.
    LayoutChanged {
        left: f32,
        right: f32,
    },
    FetchItems {
        context: CollectionContext,
        generation: u64,
    },
    FetchChatHistory {
        thread_id: String,
        generation: u64,
    },
    SendChatMessage {
        thread_id: String,
        generation: u64,
        text: String,
    },
}
