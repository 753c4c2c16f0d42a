/// Drill-down depth of a selection path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SelectionDepth {
    Empty,
    Item,
    View,
    SubView,
}

impl SelectionDepth {
    /// Depth one level up. `Empty` stays `Empty`.
    pub fn shallower(self) -> Self {
        match self {
            SelectionDepth::Empty | SelectionDepth::Item => {
                SelectionDepth::Empty
            },
            SelectionDepth::View => SelectionDepth::Item,
            SelectionDepth::SubView => SelectionDepth::View,
        }
    }
}

/// Ids of the selected item, view and sub-view.
///
/// A deeper id is never set without its parent; the constructors below are
/// the only way to build a non-empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SelectionPath {
    item: Option<String>,
    view: Option<String>,
    sub_view: Option<String>,
}

impl SelectionPath {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item.as_deref()
    }

    pub fn view_id(&self) -> Option<&str> {
        self.view.as_deref()
    }

    pub fn sub_view_id(&self) -> Option<&str> {
        self.sub_view.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    pub fn depth(&self) -> SelectionDepth {
        match (&self.item, &self.view, &self.sub_view) {
            (None, _, _) => SelectionDepth::Empty,
            (Some(_), None, _) => SelectionDepth::Item,
            (Some(_), Some(_), None) => SelectionDepth::View,
            (Some(_), Some(_), Some(_)) => SelectionDepth::SubView,
        }
    }

    pub(crate) fn item(item_id: impl Into<String>) -> Self {
        Self {
            item: Some(item_id.into()),
            view: None,
            sub_view: None,
        }
    }

    /// Keep the item, replace the view and drop the sub-view.
    pub(crate) fn with_view(&self, view_id: Option<String>) -> Self {
        if self.item.is_none() {
            return Self::empty();
        }

        Self {
            item: self.item.clone(),
            view: view_id,
            sub_view: None,
        }
    }

    /// Keep item and view, replace the sub-view.
    pub(crate) fn with_sub_view(&self, sub_view_id: Option<String>) -> Self {
        if self.view.is_none() {
            return self.with_view(None);
        }

        Self {
            item: self.item.clone(),
            view: self.view.clone(),
            sub_view: sub_view_id,
        }
    }

    /// Drop every level deeper than `depth`.
    pub(crate) fn truncated(&self, depth: SelectionDepth) -> Self {
        match depth {
            SelectionDepth::Empty => Self::empty(),
            SelectionDepth::Item => self.with_view(None),
            SelectionDepth::View => self.with_sub_view(None),
            SelectionDepth::SubView => self.clone(),
        }
    }
}

/// A committed change of the selection path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTransition {
    pub previous: SelectionPath,
    pub current: SelectionPath,
}

impl SelectionTransition {
    pub fn item_changed(&self) -> bool {
        self.previous.item_id() != self.current.item_id()
    }

    pub fn view_changed(&self) -> bool {
        self.previous.view_id() != self.current.view_id()
    }

    pub fn sub_view_changed(&self) -> bool {
        self.previous.sub_view_id() != self.current.sub_view_id()
    }

    /// Fold a follow-up transition into this one.
    ///
    /// Returns `None` when the pair cancels out.
    pub fn then(
        self,
        next: SelectionTransition,
    ) -> Option<SelectionTransition> {
        if self.previous == next.current {
            return None;
        }

        Some(SelectionTransition {
            previous: self.previous,
            current: next.current,
        })
    }
}

/// Merge two optional transitions that happened back to back.
pub(crate) fn chain_transitions(
    first: Option<SelectionTransition>,
    second: Option<SelectionTransition>,
) -> Option<SelectionTransition> {
    match (first, second) {
        (Some(first), Some(second)) => first.then(second),
        (first, None) => first,
        (None, second) => second,
    }
}

/// Subscriber notified after every committed selection transition.
pub trait SelectionObserver {
    fn on_transition(&mut self, transition: &SelectionTransition);
}
