use crate::effect::BrowserEffect;
use crate::model::Item;
use crate::selection::{
    SelectionMachine, SelectionTransition, chain_transitions,
};
use crate::source::Domain;

/// Who owns the selected item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// The selection machine is the only source of truth.
    #[default]
    Standalone,
    /// A parent owns the id per domain; local state mirrors it and user
    /// choices are published back.
    Controlled,
}

/// Result of one sync step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    pub transition: Option<SelectionTransition>,
    pub effects: Vec<BrowserEffect>,
}

impl SyncOutcome {
    fn transition(transition: Option<SelectionTransition>) -> Self {
        Self {
            transition,
            effects: Vec::new(),
        }
    }
}

/// Keeps the selection machine aligned with externally owned ids and with
/// item sequence changes.
///
/// Only the active domain's id is ever resolved. The id of the other domain
/// is kept until that domain becomes active, and the id of the domain being
/// left is cleared so it cannot resurface later.
#[derive(Debug, Default)]
pub struct SelectionSync {
    mode: SyncMode,
    active_domain: Domain,
    job_id: Option<String>,
    thread_id: Option<String>,
    pending_id: Option<String>,
}

impl SelectionSync {
    pub fn new(mode: SyncMode, active_domain: Domain) -> Self {
        Self {
            mode,
            active_domain,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn active_domain(&self) -> Domain {
        self.active_domain
    }

    /// Externally owned id for `domain`.
    pub fn external_id(&self, domain: Domain) -> Option<&str> {
        match domain {
            Domain::Jobs => self.job_id.as_deref(),
            Domain::Threads => self.thread_id.as_deref(),
        }
    }

    /// Id waiting to appear in the sequence (standalone creations).
    pub fn pending_id(&self) -> Option<&str> {
        self.pending_id.as_deref()
    }

    /// The parent changed the id it wants selected.
    pub fn external_id_changed(
        &mut self,
        machine: &mut SelectionMachine,
        domain: Domain,
        id: Option<String>,
    ) -> SyncOutcome {
        if self.mode == SyncMode::Standalone {
            log::debug!("standalone browser ignores external {domain} id");
            return SyncOutcome::default();
        }

        *self.slot_mut(domain) = id;
        if domain != self.active_domain {
            return SyncOutcome::default();
        }

        SyncOutcome::transition(self.resolve(machine))
    }

    /// The item sequence was replaced (re-fetch, creation, deletion).
    pub fn items_replaced(
        &mut self,
        machine: &mut SelectionMachine,
        items: Vec<Item>,
    ) -> SyncOutcome {
        let replaced = machine.replace_items(items);
        let resolved = self.resolve(machine);

        SyncOutcome::transition(chain_transitions(replaced, resolved))
    }

    /// The user picked an item (or went back to the list).
    pub fn user_selected_item(
        &mut self,
        machine: &mut SelectionMachine,
        item_id: Option<&str>,
    ) -> SyncOutcome {
        let transition = machine.select_item(item_id);
        let selected = machine.path().item_id().map(str::to_string);

        match self.mode {
            SyncMode::Standalone => {
                self.pending_id = None;
                SyncOutcome::transition(transition)
            },
            SyncMode::Controlled => SyncOutcome {
                transition,
                effects: self.publish(selected),
            },
        }
    }

    /// The displayed domain changed; forget the id of the one being left.
    pub fn switch_domain(&mut self, domain: Domain) -> Vec<BrowserEffect> {
        if domain == self.active_domain {
            return Vec::new();
        }

        let left = domain.other();
        self.active_domain = domain;
        self.pending_id = None;

        let had_id = self.slot_mut(left).take().is_some();
        if self.mode == SyncMode::Controlled && had_id {
            return vec![BrowserEffect::PublishSelectedId {
                domain: left,
                id: None,
            }];
        }

        Vec::new()
    }

    /// A create succeeded: adopt the new id as the selection.
    pub fn item_created(
        &mut self,
        machine: &mut SelectionMachine,
        item_id: String,
    ) -> SyncOutcome {
        match self.mode {
            SyncMode::Standalone => {
                self.pending_id = Some(item_id);
                SyncOutcome::transition(self.resolve(machine))
            },
            SyncMode::Controlled => {
                let effects = self.publish(Some(item_id));
                SyncOutcome {
                    transition: self.resolve(machine),
                    effects,
                }
            },
        }
    }

    /// A delete succeeded: drop every reference to the removed id.
    pub fn item_deleted(
        &mut self,
        machine: &mut SelectionMachine,
        item_id: &str,
    ) -> SyncOutcome {
        if self.pending_id.as_deref() == Some(item_id) {
            self.pending_id = None;
        }

        let transition = if machine.path().item_id() == Some(item_id) {
            machine.select_item(None)
        } else {
            None
        };

        let owned = self.external_id(self.active_domain) == Some(item_id);
        let effects = if self.mode == SyncMode::Controlled && owned {
            self.publish(None)
        } else {
            Vec::new()
        };

        SyncOutcome {
            transition,
            effects,
        }
    }

    /// A new collection is being browsed.
    pub fn reset_for_collection(&mut self) {
        self.pending_id = None;
    }

    fn resolve(
        &mut self,
        machine: &mut SelectionMachine,
    ) -> Option<SelectionTransition> {
        if self.mode == SyncMode::Standalone {
            let pending = self.pending_id.clone()?;
            if !machine.items().iter().any(|item| item.id == pending) {
                return None;
            }
            self.pending_id = None;
            return machine.select_item(Some(&pending));
        }

        let desired =
            self.external_id(self.active_domain).map(str::to_string);
        if machine.path().item_id() == desired.as_deref() {
            return None;
        }

        machine.select_item(desired.as_deref())
    }

    fn publish(&mut self, id: Option<String>) -> Vec<BrowserEffect> {
        let domain = self.active_domain;
        let slot = self.slot_mut(domain);
        if *slot == id {
            return Vec::new();
        }

        slot.clone_from(&id);
        vec![BrowserEffect::PublishSelectedId { domain, id }]
    }

    fn slot_mut(&mut self, domain: Domain) -> &mut Option<String> {
        match domain {
            Domain::Jobs => &mut self.job_id,
            Domain::Threads => &mut self.thread_id,
        }
    }
}
