use crate::selection::SelectionDepth;

/// How panes are arranged for the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Resizable list, item and view panes next to each other.
    SideBySide,
    /// Full-size pages in one horizontally snapping strip.
    Paged,
}

impl Strategy {
    /// Pick the strategy for a viewport width in pixels.
    pub fn for_width(width: f32, breakpoint: f32) -> Self {
        if width >= breakpoint {
            Strategy::SideBySide
        } else {
            Strategy::Paged
        }
    }
}

/// Page of the paged strip, one per selection level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Page {
    List,
    ItemDetail,
    ViewDetail,
    SubViewDetail,
}

impl Page {
    /// Page that shows the deepest level of a path at `depth`.
    pub fn for_depth(depth: SelectionDepth) -> Self {
        match depth {
            SelectionDepth::Empty => Page::List,
            SelectionDepth::Item => Page::ItemDetail,
            SelectionDepth::View => Page::ViewDetail,
            SelectionDepth::SubView => Page::SubViewDetail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// What a pane renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneContent {
    List {
        selected_item_id: Option<String>,
    },
    ItemDetail {
        item_id: String,
        selected_view_id: Option<String>,
    },
    /// Item detail slot with nothing selected.
    EmptyPrompt,
    ViewDetail {
        item_id: String,
        view_id: String,
        selected_sub_view_id: Option<String>,
        chat_thread_id: Option<String>,
    },
    SubViewDetail {
        view_id: String,
        sub_view_id: String,
    },
}

/// One pane (side by side) or page (paged) of the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    pub page: Page,
    /// Share of the viewport width. `None` for full-size pages.
    pub width_percent: Option<f32>,
    pub content: PaneContent,
}

/// Ordered panes to render for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub strategy: Strategy,
    pub panes: Vec<Pane>,
}

impl LayoutPlan {
    pub fn pages(&self) -> Vec<Page> {
        self.panes.iter().map(|pane| pane.page).collect()
    }

    pub fn pane(&self, page: Page) -> Option<&Pane> {
        self.panes.iter().find(|pane| pane.page == page)
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, Strategy};
    use crate::selection::SelectionDepth;

    #[test]
    fn given_widths_around_breakpoint_when_picking_then_strategy_switches() {
        assert_eq!(Strategy::for_width(768.0, 768.0), Strategy::SideBySide);
        assert_eq!(Strategy::for_width(767.0, 768.0), Strategy::Paged);
    }

    #[test]
    fn given_depths_when_mapped_then_pages_follow_selection_levels() {
        assert_eq!(Page::for_depth(SelectionDepth::Empty), Page::List);
        assert_eq!(
            Page::for_depth(SelectionDepth::SubView),
            Page::SubViewDetail
        );
        assert!(Page::List < Page::ItemDetail);
    }
}
