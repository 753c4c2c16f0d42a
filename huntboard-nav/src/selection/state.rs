use crate::model::{Item, View, find_item, find_sub_view, find_view};

use super::model::{SelectionDepth, SelectionPath, SelectionTransition};

/// Selection resolved against the current item sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState<'a> {
    Empty,
    ItemSelected {
        item: &'a Item,
    },
    ViewSelected {
        item: &'a Item,
        view: &'a View,
    },
    SubViewSelected {
        item: &'a Item,
        view: &'a View,
        sub_view: &'a View,
    },
}

impl SelectionState<'_> {
    pub fn depth(&self) -> SelectionDepth {
        match self {
            SelectionState::Empty => SelectionDepth::Empty,
            SelectionState::ItemSelected { .. } => SelectionDepth::Item,
            SelectionState::ViewSelected { .. } => SelectionDepth::View,
            SelectionState::SubViewSelected { .. } => SelectionDepth::SubView,
        }
    }
}

/// Item -> view -> sub-view selection over an externally supplied sequence.
///
/// The path stores ids only and every id is resolved against the items at
/// the moment of the call, so re-fetched items keep their selection and
/// stale ids collapse to a shallower state instead of dangling. Each
/// operation returns the committed transition, or `None` when nothing
/// changed.
#[derive(Debug, Default)]
pub struct SelectionMachine {
    items: Vec<Item>,
    path: SelectionPath,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            path: SelectionPath::empty(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn path(&self) -> &SelectionPath {
        &self.path
    }

    pub fn depth(&self) -> SelectionDepth {
        self.path.depth()
    }

    pub fn state(&self) -> SelectionState<'_> {
        let Some(item) = self.selected_item() else {
            return SelectionState::Empty;
        };
        let Some(view) = self.selected_view() else {
            return SelectionState::ItemSelected { item };
        };
        match self.selected_sub_view() {
            Some(sub_view) => SelectionState::SubViewSelected {
                item,
                view,
                sub_view,
            },
            None => SelectionState::ViewSelected { item, view },
        }
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.path
            .item_id()
            .and_then(|item_id| find_item(&self.items, item_id))
    }

    pub fn selected_view(&self) -> Option<&View> {
        let item = self.selected_item()?;
        self.path
            .view_id()
            .and_then(|view_id| find_view(item, view_id))
    }

    pub fn selected_sub_view(&self) -> Option<&View> {
        let view = self.selected_view()?;
        self.path
            .sub_view_id()
            .and_then(|sub_view_id| find_sub_view(view, sub_view_id))
    }

    /// Select an item by id, clearing view and sub-view.
    ///
    /// `None` and unknown ids both yield the empty path.
    pub fn select_item(
        &mut self,
        item_id: Option<&str>,
    ) -> Option<SelectionTransition> {
        let next = match item_id {
            Some(item_id) => match find_item(&self.items, item_id) {
                Some(item) => SelectionPath::item(item.id.clone()),
                None => {
                    log::debug!("item {item_id} is not in the sequence");
                    SelectionPath::empty()
                },
            },
            None => SelectionPath::empty(),
        };

        self.commit(next)
    }

    /// Select a view of the selected item, clearing the sub-view.
    ///
    /// Calling it with no item selected is a caller error: it asserts in
    /// debug builds and is ignored otherwise.
    pub fn select_view(
        &mut self,
        view_id: Option<&str>,
    ) -> Option<SelectionTransition> {
        let Some(item) = self.selected_item() else {
            debug_assert!(false, "select_view requires a selected item");
            log::warn!("ignored view selection without a selected item");
            return None;
        };

        let view_id = view_id.and_then(|view_id| {
            let found = find_view(item, view_id).map(|view| view.id.clone());
            if found.is_none() {
                log::debug!("view {view_id} does not belong to {}", item.id);
            }
            found
        });

        let next = self.path.with_view(view_id);
        self.commit(next)
    }

    /// Select a sub-view of the selected view.
    ///
    /// Calling it with no view selected is a caller error: it asserts in
    /// debug builds and is ignored otherwise.
    pub fn select_sub_view(
        &mut self,
        sub_view_id: Option<&str>,
    ) -> Option<SelectionTransition> {
        let Some(view) = self.selected_view() else {
            debug_assert!(false, "select_sub_view requires a selected view");
            log::warn!("ignored sub-view selection without a selected view");
            return None;
        };

        let sub_view_id = sub_view_id.and_then(|sub_view_id| {
            let found = find_sub_view(view, sub_view_id)
                .map(|sub_view| sub_view.id.clone());
            if found.is_none() {
                log::debug!(
                    "sub-view {sub_view_id} does not belong to {}",
                    view.id
                );
            }
            found
        });

        let next = self.path.with_sub_view(sub_view_id);
        self.commit(next)
    }

    /// Clear the deepest selected level. No-op on the empty path.
    pub fn go_back_one_level(&mut self) -> Option<SelectionTransition> {
        match self.depth() {
            SelectionDepth::Empty => None,
            SelectionDepth::Item => self.select_item(None),
            SelectionDepth::View => self.select_view(None),
            SelectionDepth::SubView => self.select_sub_view(None),
        }
    }

    /// Clear every level deeper than `depth`.
    pub fn truncate_to(
        &mut self,
        depth: SelectionDepth,
    ) -> Option<SelectionTransition> {
        if depth >= self.depth() {
            return None;
        }

        let next = self.path.truncated(depth);
        self.commit(next)
    }

    /// Clear the whole path for a new collection context.
    pub fn reset(&mut self) -> Option<SelectionTransition> {
        self.select_item(None)
    }

    /// Replace the item sequence, keeping whatever part of the path still
    /// resolves by id.
    pub fn replace_items(
        &mut self,
        items: Vec<Item>,
    ) -> Option<SelectionTransition> {
        self.items = items;

        let next = self.reconciled_path();
        self.commit(next)
    }

    fn reconciled_path(&self) -> SelectionPath {
        let Some(item) = self.selected_item() else {
            return SelectionPath::empty();
        };
        let path = SelectionPath::item(item.id.clone());

        let Some(view) = self.selected_view() else {
            return path;
        };
        let path = path.with_view(Some(view.id.clone()));

        match self.selected_sub_view() {
            Some(sub_view) => path.with_sub_view(Some(sub_view.id.clone())),
            None => path,
        }
    }

    fn commit(&mut self, next: SelectionPath) -> Option<SelectionTransition> {
        if next == self.path {
            return None;
        }

        let previous = std::mem::replace(&mut self.path, next);
        Some(SelectionTransition {
            previous,
            current: self.path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionMachine, SelectionState};
    use crate::model::{Item, View};
    use crate::selection::SelectionDepth;

    fn items() -> Vec<Item> {
        vec![
            Item::new("1", "A").with_views(vec![
                View::new("1-1", "Info").with_sub_views(vec![
                    View::new("1-1-1", "Culture"),
                    View::new("1-1-2", "Stack"),
                ]),
                View::new("1-2", "Notes"),
            ]),
            Item::new("2", "B").with_views(vec![View::new("2-1", "Info")]),
        ]
    }

    fn machine_at_sub_view() -> SelectionMachine {
        let mut machine = SelectionMachine::with_items(items());
        machine.select_item(Some("1"));
        machine.select_view(Some("1-1"));
        machine.select_sub_view(Some("1-1-2"));
        machine
    }

    fn assert_parent_invariant(machine: &SelectionMachine) {
        let path = machine.path();
        if path.sub_view_id().is_some() {
            assert!(path.view_id().is_some());
        }
        if path.view_id().is_some() {
            assert!(path.item_id().is_some());
        }
    }

    #[test]
    fn given_item_then_view_when_going_back_then_item_stays_selected() {
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

        let transition =
            machine.go_back_one_level().expect("back should transition");

        assert!(transition.view_changed());
        assert!(!transition.item_changed());
        assert_eq!(machine.depth(), SelectionDepth::Item);
        assert_eq!(machine.path().view_id(), None);
    }

    #[test]
    fn given_sub_view_selected_when_going_back_then_view_is_retained() {
        let mut machine = machine_at_sub_view();

        machine.go_back_one_level();

        assert_eq!(machine.depth(), SelectionDepth::View);
        assert_eq!(machine.path().item_id(), Some("1"));
        assert_eq!(machine.path().view_id(), Some("1-1"));
    }

    #[test]
    fn given_empty_path_when_going_back_then_nothing_changes() {
        let mut machine = SelectionMachine::with_items(items());

        assert_eq!(machine.go_back_one_level(), None);
        assert_eq!(machine.state(), SelectionState::Empty);
    }

    #[test]
    fn given_any_depth_when_selecting_no_item_then_path_is_empty() {
        let mut machine = machine_at_sub_view();

        machine.select_item(None);

        assert_eq!(machine.state(), SelectionState::Empty);
        assert_parent_invariant(&machine);
    }

    #[test]
    fn given_view_selected_when_selecting_another_item_then_depth_is_item() {
        let mut machine = machine_at_sub_view();

        let transition = machine
            .select_item(Some("2"))
            .expect("new item should transition");

        assert!(transition.item_changed());
        assert!(transition.view_changed());
        assert_eq!(machine.depth(), SelectionDepth::Item);
    }

    #[test]
    fn given_sub_view_selected_when_clearing_view_then_drops_to_item() {
        let mut machine = machine_at_sub_view();

        machine.select_view(None);

        assert_eq!(machine.depth(), SelectionDepth::Item);
        assert_eq!(machine.path().sub_view_id(), None);
    }

    #[test]
    fn given_stale_item_id_when_selected_then_path_is_empty() {
        let mut machine = machine_at_sub_view();

        machine.select_item(Some("missing"));

        assert_eq!(machine.state(), SelectionState::Empty);
    }

    #[test]
    fn given_view_of_other_item_when_selected_then_view_resolves_to_none() {
        let mut machine = SelectionMachine::with_items(items());
        machine.select_item(Some("1"));

        let transition = machine.select_view(Some("2-1"));

        assert_eq!(transition, None);
        assert_eq!(machine.depth(), SelectionDepth::Item);
    }

    #[test]
    fn given_same_view_when_selected_twice_then_second_is_no_op() {
        let mut machine = SelectionMachine::with_items(items());
        machine.select_item(Some("1"));

        assert!(machine.select_view(Some("1-2")).is_some());
        assert_eq!(machine.select_view(Some("1-2")), None);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "select_view requires a selected item")]
    fn given_no_item_when_selecting_view_then_debug_build_asserts() {
        let mut machine = SelectionMachine::with_items(items());

        machine.select_view(Some("1-1"));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "select_sub_view requires a selected view")]
    fn given_no_view_when_selecting_sub_view_then_debug_build_asserts() {
        let mut machine = SelectionMachine::with_items(items());
        machine.select_item(Some("1"));

        machine.select_sub_view(Some("1-1-1"));
    }

    #[test]
    fn given_sub_view_depth_when_truncated_then_deeper_levels_clear() {
        let mut machine = machine_at_sub_view();

        let transition = machine
            .truncate_to(SelectionDepth::Item)
            .expect("truncation should transition");

        assert_eq!(transition.previous.depth(), SelectionDepth::SubView);
        assert_eq!(transition.current.item_id(), Some("1"));
        assert_eq!(machine.depth(), SelectionDepth::Item);
        assert_eq!(machine.truncate_to(SelectionDepth::View), None);

        machine
            .truncate_to(SelectionDepth::Empty)
            .expect("truncation to empty should transition");
        assert!(machine.path().is_empty());
    }

    #[test]
    fn given_refetched_items_with_same_ids_when_replaced_then_path_is_kept() {
        let mut machine = machine_at_sub_view();

        let refetched = items()
            .into_iter()
            .map(|item| item.with_description("refreshed"))
            .collect();
        let transition = machine.replace_items(refetched);

        assert_eq!(transition, None);
        assert_eq!(machine.depth(), SelectionDepth::SubView);
        assert_eq!(
            machine.selected_item().map(|item| item.description.as_str()),
            Some("refreshed")
        );
    }

    #[test]
    fn given_selected_item_removed_when_replaced_then_path_is_empty() {
        let mut machine = machine_at_sub_view();

        let transition = machine
            .replace_items(vec![Item::new("2", "B")])
            .expect("removal should transition");

        assert!(transition.item_changed());
        assert_eq!(machine.state(), SelectionState::Empty);
    }

    #[test]
    fn given_selected_sub_view_removed_when_replaced_then_view_is_kept() {
        let mut machine = machine_at_sub_view();

        machine.replace_items(vec![Item::new("1", "A").with_views(vec![
            View::new("1-1", "Info")
                .with_sub_views(vec![View::new("1-1-1", "Culture")]),
        ])]);

        assert_eq!(machine.depth(), SelectionDepth::View);
        assert_eq!(machine.path().view_id(), Some("1-1"));
        assert_parent_invariant(&machine);
    }

    #[test]
    fn given_any_path_when_reset_then_state_is_empty() {
        let mut machine = machine_at_sub_view();

        assert!(machine.reset().is_some());
        assert_eq!(machine.reset(), None);
        assert_eq!(machine.state(), SelectionState::Empty);
    }
}
