use crate::config::NavigationTiming;
use crate::deferred::DeferredToken;
use crate::effect::BrowserEffect;
use crate::selection::{
    SelectionDepth, SelectionMachine, SelectionObserver, SelectionTransition,
};

use super::layout::PanelLayoutState;
use super::model::{
    LayoutPlan, Page, Pane, PaneContent, ScrollBehavior, Strategy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingLeave {
    token: DeferredToken,
    target: SelectionDepth,
}

/// Effects of starting a back navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct LeavePlan {
    pub effects: Vec<BrowserEffect>,
    /// Apply the truncation right away instead of waiting for a deferred
    /// commit.
    pub commit_now: bool,
    pub target: SelectionDepth,
}

/// Result of a deferred token firing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeferredOutcome {
    pub commit: Option<SelectionDepth>,
    pub effects: Vec<BrowserEffect>,
}

/// Maps the selection to panes and sequences scroll side effects.
///
/// Scroll effects only matter for the paged strategy; side-by-side panes
/// are always rendered from the current selection.
#[derive(Debug)]
pub struct PresentationAdapter {
    strategy: Strategy,
    breakpoint: f32,
    viewport_width: f32,
    timing: NavigationTiming,
    layout: PanelLayoutState,
    skip_next_item_scroll: bool,
    returning_to_list: bool,
    pending_leave: Option<PendingLeave>,
    guard_token: Option<DeferredToken>,
    next_token: u64,
    scroll_reset_generation: u64,
    outbox: Vec<BrowserEffect>,
}

impl PresentationAdapter {
    pub fn new(
        layout: PanelLayoutState,
        timing: NavigationTiming,
        breakpoint: f32,
        viewport_width: f32,
    ) -> Self {
        Self {
            strategy: Strategy::for_width(viewport_width, breakpoint),
            breakpoint,
            viewport_width,
            timing,
            layout,
            skip_next_item_scroll: true,
            returning_to_list: false,
            pending_leave: None,
            guard_token: None,
            next_token: 0,
            scroll_reset_generation: 0,
            outbox: Vec::new(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn layout(&self) -> &PanelLayoutState {
        &self.layout
    }

    /// Whether the next item change will be applied without scrolling.
    pub fn is_skip_armed(&self) -> bool {
        self.skip_next_item_scroll
    }

    pub fn is_returning_to_list(&self) -> bool {
        self.returning_to_list
    }

    /// Depth a pending back navigation will truncate to.
    pub fn pending_target(&self) -> Option<SelectionDepth> {
        self.pending_leave.map(|pending| pending.target)
    }

    /// Incremented every time the strip is forced back to the list.
    pub fn scroll_reset_generation(&self) -> u64 {
        self.scroll_reset_generation
    }

    /// Install the layout, timing and breakpoint of another browser domain,
    /// returning the current layout so it can be parked.
    ///
    /// The strategy is re-derived from the last known viewport width. No
    /// scroll is emitted; a domain switch always resets to the list.
    pub fn swap_layout(
        &mut self,
        layout: PanelLayoutState,
        timing: NavigationTiming,
        breakpoint: f32,
    ) -> PanelLayoutState {
        self.timing = timing;
        self.breakpoint = breakpoint;
        self.strategy = Strategy::for_width(self.viewport_width, breakpoint);
        std::mem::replace(&mut self.layout, layout)
    }

    /// Effects collected from observed transitions since the last call.
    pub fn take_effects(&mut self) -> Vec<BrowserEffect> {
        std::mem::take(&mut self.outbox)
    }

    /// Disarm the first-render skip once the initial data is on screen.
    pub fn settle_initial_skip(&mut self) {
        self.skip_next_item_scroll = false;
    }

    /// Start a back navigation one level up from `depth`, or from the
    /// pending target when one is already in flight.
    pub fn begin_back(&mut self, depth: SelectionDepth) -> Option<LeavePlan> {
        let from = match self.pending_leave {
            Some(pending) => pending.target.min(depth),
            None => depth,
        };
        if from == SelectionDepth::Empty {
            return None;
        }

        Some(self.begin_leave(from.shallower()))
    }

    /// Start leaving every level deeper than `target`.
    ///
    /// Side by side the truncation commits at once. Paged, the strip scrolls
    /// to the target page first and the truncation is committed by a
    /// deferred token so the deeper page never vanishes mid-scroll.
    pub fn begin_leave(&mut self, target: SelectionDepth) -> LeavePlan {
        let mut effects = self.cancel_pending_leave();

        if self.strategy == Strategy::SideBySide {
            return LeavePlan {
                effects,
                commit_now: true,
                target,
            };
        }

        effects.push(BrowserEffect::ScrollTo {
            page: Page::for_depth(target),
            behavior: ScrollBehavior::Smooth,
        });

        let delay = if target == SelectionDepth::Empty {
            let guard = self.allocate_token();
            self.returning_to_list = true;
            self.guard_token = Some(guard);
            effects.push(BrowserEffect::SetSnapEnabled(false));
            effects.push(BrowserEffect::Schedule {
                token: guard,
                after: self.timing.back_guard_release(),
            });
            self.timing.list_leave_clear()
        } else {
            self.timing.leave_settle()
        };

        let token = self.allocate_token();
        self.pending_leave = Some(PendingLeave { token, target });
        effects.push(BrowserEffect::Schedule {
            token,
            after: delay,
        });

        LeavePlan {
            effects,
            commit_now: false,
            target,
        }
    }

    /// Drop any in-flight back navigation and release the list guard.
    ///
    /// Called before every forward navigation so a late commit can never
    /// undo what the user just selected.
    pub fn cancel_pending_leave(&mut self) -> Vec<BrowserEffect> {
        let mut effects = Vec::new();

        if let Some(pending) = self.pending_leave.take() {
            effects.push(BrowserEffect::Cancel {
                token: pending.token,
            });
        }

        if let Some(guard) = self.guard_token.take() {
            self.returning_to_list = false;
            effects.push(BrowserEffect::Cancel { token: guard });
            effects.push(BrowserEffect::SetSnapEnabled(true));
        }

        effects
    }

    /// Resolve a fired deferred token.
    pub fn on_deferred(&mut self, token: DeferredToken) -> DeferredOutcome {
        if let Some(pending) = self.pending_leave {
            if pending.token == token {
                self.pending_leave = None;
                return DeferredOutcome {
                    commit: Some(pending.target),
                    effects: Vec::new(),
                };
            }
        }

        if self.guard_token == Some(token) {
            self.guard_token = None;
            self.returning_to_list = false;
            return DeferredOutcome {
                commit: None,
                effects: vec![BrowserEffect::SetSnapEnabled(true)],
            };
        }

        log::debug!("ignoring stale deferred token {token:?}");
        DeferredOutcome::default()
    }

    /// Force the strip back to the list as if freshly mounted.
    pub fn reset_for_collection(&mut self) -> Vec<BrowserEffect> {
        let mut effects = self.cancel_pending_leave();
        self.skip_next_item_scroll = true;
        self.scroll_reset_generation += 1;

        if self.strategy == Strategy::Paged {
            effects.push(BrowserEffect::ScrollTo {
                page: Page::List,
                behavior: ScrollBehavior::Smooth,
            });
        }

        effects
    }

    /// Track the viewport. Entering the paged strategy jumps straight to
    /// the page of the deepest selected level.
    pub fn set_viewport_width(
        &mut self,
        width: f32,
        depth: SelectionDepth,
    ) -> Vec<BrowserEffect> {
        self.viewport_width = width;
        let strategy = Strategy::for_width(width, self.breakpoint);
        if strategy == self.strategy {
            return Vec::new();
        }

        log::debug!(
            "presentation strategy {:?} -> {strategy:?}",
            self.strategy
        );
        self.strategy = strategy;

        match strategy {
            Strategy::Paged => vec![BrowserEffect::ScrollTo {
                page: Page::for_depth(depth),
                behavior: ScrollBehavior::Instant,
            }],
            Strategy::SideBySide => Vec::new(),
        }
    }

    pub fn resize_left(&mut self, percent: f32) -> Vec<BrowserEffect> {
        let changed = self.layout.resize_left(percent);
        self.layout_effects(changed)
    }

    pub fn resize_right(&mut self, percent: f32) -> Vec<BrowserEffect> {
        let changed = self.layout.resize_right(percent);
        self.layout_effects(changed)
    }

    /// Panes to render for the machine's current selection.
    pub fn plan(&self, machine: &SelectionMachine) -> LayoutPlan {
        let item = machine.selected_item();
        let view = machine.selected_view();
        let sub_view = machine.selected_sub_view();

        let list = PaneContent::List {
            selected_item_id: item.map(|item| item.id.clone()),
        };
        let item_detail = item.map(|item| PaneContent::ItemDetail {
            item_id: item.id.clone(),
            selected_view_id: view.map(|view| view.id.clone()),
        });
        let view_detail = match (item, view) {
            (Some(item), Some(view)) => Some(PaneContent::ViewDetail {
                item_id: item.id.clone(),
                view_id: view.id.clone(),
                selected_sub_view_id: sub_view
                    .map(|sub_view| sub_view.id.clone()),
                chat_thread_id: view.chat_thread_id().map(str::to_string),
            }),
            _ => None,
        };

        let mut panes = Vec::new();
        match self.strategy {
            Strategy::SideBySide => {
                let widths = self.layout.layout();
                panes.push(Pane {
                    page: Page::List,
                    width_percent: Some(widths.left),
                    content: list,
                });
                panes.push(Pane {
                    page: Page::ItemDetail,
                    width_percent: Some(widths.middle(view_detail.is_some())),
                    content: item_detail.unwrap_or(PaneContent::EmptyPrompt),
                });
                if let Some(content) = view_detail {
                    panes.push(Pane {
                        page: Page::ViewDetail,
                        width_percent: Some(widths.right),
                        content,
                    });
                }
            },
            Strategy::Paged => {
                panes.push(Pane {
                    page: Page::List,
                    width_percent: None,
                    content: list,
                });
                if let Some(content) = item_detail {
                    panes.push(Pane {
                        page: Page::ItemDetail,
                        width_percent: None,
                        content,
                    });
                }
                if let Some(content) = view_detail {
                    panes.push(Pane {
                        page: Page::ViewDetail,
                        width_percent: None,
                        content,
                    });
                }
                if let (Some(view), Some(sub_view)) = (view, sub_view) {
                    panes.push(Pane {
                        page: Page::SubViewDetail,
                        width_percent: None,
                        content: PaneContent::SubViewDetail {
                            view_id: view.id.clone(),
                            sub_view_id: sub_view.id.clone(),
                        },
                    });
                }
            },
        }

        LayoutPlan {
            strategy: self.strategy,
            panes,
        }
    }

    fn layout_effects(&self, changed: bool) -> Vec<BrowserEffect> {
        if !changed {
            return Vec::new();
        }

        let layout = self.layout.layout();
        vec![BrowserEffect::LayoutChanged {
            left: layout.left,
            right: layout.right,
        }]
    }

    fn scroll_effects(
        &mut self,
        transition: &SelectionTransition,
    ) -> Vec<BrowserEffect> {
        let mut effects = Vec::new();
        let current = &transition.current;

        if transition.item_changed() {
            if self.skip_next_item_scroll {
                self.skip_next_item_scroll = false;
                return effects;
            }
            if current.item_id().is_some() && !self.returning_to_list {
                effects.push(smooth_scroll(Page::ItemDetail));
            }
        }

        if transition.view_changed() && current.view_id().is_some() {
            effects.push(smooth_scroll(Page::ViewDetail));
        }

        if transition.sub_view_changed() && current.sub_view_id().is_some() {
            effects.push(smooth_scroll(Page::SubViewDetail));
        }

        if self.strategy != Strategy::Paged {
            return Vec::new();
        }

        effects
    }

    fn allocate_token(&mut self) -> DeferredToken {
        self.next_token += 1;
        DeferredToken(self.next_token)
    }
}

impl SelectionObserver for PresentationAdapter {
    fn on_transition(&mut self, transition: &SelectionTransition) {
        let effects = self.scroll_effects(transition);
        self.outbox.extend(effects);
    }
}

fn smooth_scroll(page: Page) -> BrowserEffect {
    BrowserEffect::ScrollTo {
        page,
        behavior: ScrollBehavior::Smooth,
    }
}
