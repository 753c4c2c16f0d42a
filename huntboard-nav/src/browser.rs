use std::cell::RefCell;
use std::rc::Rc;

use crate::chat::{ChatPanel, ConversationMessage};
use crate::config::{BrowserConfig, DomainConfigs};
use crate::deferred::DeferredToken;
use crate::effect::BrowserEffect;
use crate::model::{Item, View};
use crate::presentation::{
    LayoutPlan, LayoutStore, PanelLayoutState, PresentationAdapter,
};
use crate::selection::{
    SelectionDepth, SelectionMachine, SelectionObserver, SelectionState,
    SelectionTransition, chain_transitions,
};
use crate::source::{CollectionContext, Domain};
use crate::sync::{SelectionSync, SyncMode, SyncOutcome};

/// Input accepted by [`Browser::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEvent {
    ItemPressed(String),
    ViewPressed(String),
    SubViewPressed(String),
    /// Leave the deepest selected level.
    BackPressed,
    /// Leave every level and return to the list.
    BackToList,
    DeferredElapsed {
        token: DeferredToken,
    },
    ViewportResized {
        width: f32,
    },
    LeftPaneResized(f32),
    RightPaneResized(f32),
    ExternalIdChanged {
        domain: Domain,
        id: Option<String>,
    },
    CollectionChanged(CollectionContext),
    Refresh,
    ItemsLoaded {
        generation: u64,
        items: Vec<Item>,
    },
    ItemsLoadFailed {
        generation: u64,
        message: String,
    },
    /// Items handed in directly instead of fetched.
    ItemsReplaced {
        items: Vec<Item>,
    },
    ItemCreated {
        id: String,
    },
    ItemDeleted {
        id: String,
    },
    ItemMutationFailed {
        message: String,
    },
    ChatHistoryLoaded {
        thread_id: String,
        generation: u64,
        messages: Vec<ConversationMessage>,
    },
    ChatHistoryFailed {
        thread_id: String,
        generation: u64,
        message: String,
    },
    ChatSendRequested {
        text: String,
    },
    ChatChunk {
        thread_id: String,
        generation: u64,
        text: String,
    },
    ChatFinished {
        thread_id: String,
        generation: u64,
    },
    ChatFailed {
        thread_id: String,
        generation: u64,
        message: String,
    },
}

/// Progress of the item fetch for the current collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Drill-down browser: selection, presentation, external sync and chat
/// wired behind one reducer.
pub struct Browser {
    configs: DomainConfigs,
    store: Rc<RefCell<dyn LayoutStore>>,
    context: CollectionContext,
    machine: SelectionMachine,
    adapter: PresentationAdapter,
    parked_layout: Option<(Domain, PanelLayoutState)>,
    sync: SelectionSync,
    chat: ChatPanel,
    observers: Vec<Box<dyn SelectionObserver>>,
    fetch_generation: u64,
    load_status: LoadStatus,
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("context", &self.context)
            .field("machine", &self.machine)
            .field("adapter", &self.adapter)
            .field("sync", &self.sync)
            .field("chat", &self.chat)
            .field("fetch_generation", &self.fetch_generation)
            .field("load_status", &self.load_status)
            .finish_non_exhaustive()
    }
}

impl Browser {
    pub fn new(
        configs: DomainConfigs,
        store: Rc<RefCell<dyn LayoutStore>>,
        mode: SyncMode,
        context: CollectionContext,
        viewport_width: f32,
    ) -> Self {
        let config = configs.get(context.domain);
        let layout = PanelLayoutState::load(
            config.storage_key.clone(),
            Box::new(Rc::clone(&store)),
        );
        let adapter = PresentationAdapter::new(
            layout,
            config.timing,
            config.breakpoint,
            viewport_width,
        );
        let sync = SelectionSync::new(mode, context.domain);

        Self {
            configs,
            store,
            context,
            machine: SelectionMachine::new(),
            adapter,
            parked_layout: None,
            sync,
            chat: ChatPanel::new(),
            observers: Vec::new(),
            fetch_generation: 0,
            load_status: LoadStatus::Idle,
        }
    }

    /// Request the first item fetch.
    pub fn mount(&mut self) -> Vec<BrowserEffect> {
        vec![self.request_items()]
    }

    /// Subscribe to committed selection transitions.
    pub fn add_observer(&mut self, observer: Box<dyn SelectionObserver>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &BrowserConfig {
        self.configs.get(self.context.domain)
    }

    pub fn context(&self) -> &CollectionContext {
        &self.context
    }

    pub fn machine(&self) -> &SelectionMachine {
        &self.machine
    }

    pub fn selection(&self) -> SelectionState<'_> {
        self.machine.state()
    }

    pub fn adapter(&self) -> &PresentationAdapter {
        &self.adapter
    }

    pub fn sync(&self) -> &SelectionSync {
        &self.sync
    }

    pub fn chat(&self) -> &ChatPanel {
        &self.chat
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// Generation of the latest item fetch.
    pub fn fetch_generation(&self) -> u64 {
        self.fetch_generation
    }

    pub fn plan(&self) -> LayoutPlan {
        self.adapter.plan(&self.machine)
    }

    pub fn reduce(&mut self, event: BrowserEvent) -> Vec<BrowserEffect> {
        let mut effects = Vec::new();

        match event {
            BrowserEvent::ItemPressed(_)
            | BrowserEvent::ViewPressed(_)
            | BrowserEvent::SubViewPressed(_)
            | BrowserEvent::BackPressed
            | BrowserEvent::BackToList
            | BrowserEvent::DeferredElapsed { .. } => {
                self.reduce_navigation(event, &mut effects);
            },
            BrowserEvent::ViewportResized { width } => {
                let depth = self.machine.depth();
                effects.extend(self.adapter.set_viewport_width(width, depth));
            },
            BrowserEvent::LeftPaneResized(percent) => {
                effects.extend(self.adapter.resize_left(percent));
            },
            BrowserEvent::RightPaneResized(percent) => {
                effects.extend(self.adapter.resize_right(percent));
            },
            BrowserEvent::ExternalIdChanged { domain, id } => {
                let outcome = self.sync.external_id_changed(
                    &mut self.machine,
                    domain,
                    id,
                );
                if outcome.transition.is_some() {
                    effects.extend(self.adapter.cancel_pending_leave());
                }
                self.apply_outcome(outcome, &mut effects);
            },
            BrowserEvent::CollectionChanged(context) => {
                self.change_collection(context, &mut effects);
            },
            BrowserEvent::Refresh => {
                effects.push(self.request_items());
            },
            BrowserEvent::ItemsLoaded { .. }
            | BrowserEvent::ItemsLoadFailed { .. }
            | BrowserEvent::ItemsReplaced { .. }
            | BrowserEvent::ItemCreated { .. }
            | BrowserEvent::ItemDeleted { .. }
            | BrowserEvent::ItemMutationFailed { .. } => {
                self.reduce_data(event, &mut effects);
            },
            BrowserEvent::ChatHistoryLoaded { .. }
            | BrowserEvent::ChatHistoryFailed { .. }
            | BrowserEvent::ChatSendRequested { .. }
            | BrowserEvent::ChatChunk { .. }
            | BrowserEvent::ChatFinished { .. }
            | BrowserEvent::ChatFailed { .. } => {
                self.reduce_chat(event, &mut effects);
            },
        }

        effects
    }

    fn reduce_navigation(
        &mut self,
        event: BrowserEvent,
        effects: &mut Vec<BrowserEffect>,
    ) {
        match event {
            BrowserEvent::ItemPressed(item_id) => {
                effects.extend(self.adapter.cancel_pending_leave());
                let outcome = self
                    .sync
                    .user_selected_item(&mut self.machine, Some(&item_id));
                self.apply_outcome(outcome, effects);
            },
            BrowserEvent::ViewPressed(view_id) => {
                if self.machine.selected_item().is_none() {
                    log::debug!("ignoring view {view_id} pressed without item");
                    return;
                }
                effects.extend(self.adapter.cancel_pending_leave());
                let transition = self.machine.select_view(Some(&view_id));
                self.apply(transition, effects);
            },
            BrowserEvent::SubViewPressed(sub_view_id) => {
                if self.machine.selected_view().is_none() {
                    log::debug!(
                        "ignoring sub-view {sub_view_id} pressed without view"
                    );
                    return;
                }
                effects.extend(self.adapter.cancel_pending_leave());
                let transition =
                    self.machine.select_sub_view(Some(&sub_view_id));
                self.apply(transition, effects);
            },
            BrowserEvent::BackPressed => {
                let depth = self.machine.depth();
                if let Some(plan) = self.adapter.begin_back(depth) {
                    effects.extend(plan.effects);
                    if plan.commit_now {
                        self.commit_leave(plan.target, effects);
                    }
                }
            },
            BrowserEvent::BackToList => {
                if self.machine.depth() == SelectionDepth::Empty
                    && self.adapter.pending_target().is_none()
                {
                    return;
                }
                let plan = self.adapter.begin_leave(SelectionDepth::Empty);
                effects.extend(plan.effects);
                if plan.commit_now {
                    self.commit_leave(plan.target, effects);
                }
            },
            BrowserEvent::DeferredElapsed { token } => {
                let outcome = self.adapter.on_deferred(token);
                effects.extend(outcome.effects);
                if let Some(target) = outcome.commit {
                    self.commit_leave(target, effects);
                }
            },
            _ => {},
        }
    }

    fn reduce_data(
        &mut self,
        event: BrowserEvent,
        effects: &mut Vec<BrowserEffect>,
    ) {
        match event {
            BrowserEvent::ItemsLoaded { generation, items } => {
                if generation != self.fetch_generation {
                    log::debug!(
                        "dropping items of fetch {generation}, current is {}",
                        self.fetch_generation
                    );
                    return;
                }
                self.load_status = LoadStatus::Loaded;
                self.replace_items(items, effects);
            },
            BrowserEvent::ItemsLoadFailed {
                generation,
                message,
            } => {
                if generation != self.fetch_generation {
                    log::debug!("dropping failure of stale fetch {generation}");
                    return;
                }
                log::warn!("loading {} failed: {message}", self.context);
                self.load_status = LoadStatus::Failed(message);
                self.replace_items(Vec::new(), effects);
            },
            BrowserEvent::ItemsReplaced { items } => {
                self.load_status = LoadStatus::Loaded;
                self.replace_items(items, effects);
            },
            BrowserEvent::ItemCreated { id } => {
                effects.extend(self.adapter.cancel_pending_leave());
                let outcome = self.sync.item_created(&mut self.machine, id);
                self.apply_outcome(outcome, effects);
                effects.push(self.request_items());
            },
            BrowserEvent::ItemDeleted { id } => {
                let outcome = self.sync.item_deleted(&mut self.machine, &id);
                self.apply_outcome(outcome, effects);
                effects.push(self.request_items());
            },
            BrowserEvent::ItemMutationFailed { message } => {
                log::warn!("item mutation failed: {message}");
            },
            _ => {},
        }
    }

    fn reduce_chat(
        &mut self,
        event: BrowserEvent,
        effects: &mut Vec<BrowserEffect>,
    ) {
        match event {
            BrowserEvent::ChatHistoryLoaded {
                thread_id,
                generation,
                messages,
            } => {
                self.chat.history_loaded(&thread_id, generation, messages);
            },
            BrowserEvent::ChatHistoryFailed {
                thread_id,
                generation,
                message,
            } => {
                self.chat.history_failed(&thread_id, generation, message);
            },
            BrowserEvent::ChatSendRequested { text } => {
                effects.extend(self.chat.send(&text));
            },
            BrowserEvent::ChatChunk {
                thread_id,
                generation,
                text,
            } => {
                self.chat.chunk(&thread_id, generation, &text);
            },
            BrowserEvent::ChatFinished {
                thread_id,
                generation,
            } => {
                self.chat.finished(&thread_id, generation);
            },
            BrowserEvent::ChatFailed {
                thread_id,
                generation,
                message,
            } => {
                self.chat.failed(&thread_id, generation, message);
            },
            _ => {},
        }
    }

    fn change_collection(
        &mut self,
        context: CollectionContext,
        effects: &mut Vec<BrowserEffect>,
    ) {
        if context == self.context {
            log::debug!("collection {context} unchanged");
            return;
        }

        log::debug!("collection {} -> {context}", self.context);
        if context.domain != self.context.domain {
            effects.extend(self.sync.switch_domain(context.domain));
            self.switch_layout(context.domain);
        }
        self.context = context;
        self.sync.reset_for_collection();

        let cleared = self.machine.reset();
        let emptied = self.machine.replace_items(Vec::new());
        self.apply(chain_transitions(cleared, emptied), effects);

        effects.extend(self.adapter.reset_for_collection());
        effects.push(self.request_items());
    }

    fn switch_layout(&mut self, domain: Domain) {
        let config = self.configs.get(domain);
        let layout = match self.parked_layout.take() {
            Some((parked, layout)) if parked == domain => layout,
            _ => PanelLayoutState::load(
                config.storage_key.clone(),
                Box::new(Rc::clone(&self.store)),
            ),
        };

        let previous = self.adapter.swap_layout(
            layout,
            config.timing,
            config.breakpoint,
        );
        self.parked_layout = Some((self.context.domain, previous));
    }

    fn replace_items(
        &mut self,
        items: Vec<Item>,
        effects: &mut Vec<BrowserEffect>,
    ) {
        let outcome = self.sync.items_replaced(&mut self.machine, items);
        self.apply_outcome(outcome, effects);
        self.adapter.settle_initial_skip();
    }

    fn request_items(&mut self) -> BrowserEffect {
        self.fetch_generation += 1;
        self.load_status = LoadStatus::Loading;

        BrowserEffect::FetchItems {
            context: self.context.clone(),
            generation: self.fetch_generation,
        }
    }

    fn commit_leave(
        &mut self,
        target: SelectionDepth,
        effects: &mut Vec<BrowserEffect>,
    ) {
        if target == SelectionDepth::Empty {
            let outcome = self.sync.user_selected_item(&mut self.machine, None);
            self.apply_outcome(outcome, effects);
            return;
        }

        let transition = self.machine.truncate_to(target);
        self.apply(transition, effects);
    }

    fn apply_outcome(
        &mut self,
        outcome: SyncOutcome,
        effects: &mut Vec<BrowserEffect>,
    ) {
        self.apply(outcome.transition, effects);
        effects.extend(outcome.effects);
    }

    /// Notify the adapter, the observers and the chat panel of a committed
    /// transition.
    fn apply(
        &mut self,
        transition: Option<SelectionTransition>,
        effects: &mut Vec<BrowserEffect>,
    ) {
        let Some(transition) = transition else {
            return;
        };

        self.adapter.on_transition(&transition);
        effects.extend(self.adapter.take_effects());

        for observer in &mut self.observers {
            observer.on_transition(&transition);
        }

        let thread_id = self.chat_thread_id();
        effects.extend(self.chat.open(thread_id.as_deref()));
    }

    /// Thread of the deepest selected chat view.
    fn chat_thread_id(&self) -> Option<String> {
        let chat = |view: &View| view.chat_thread_id().map(str::to_string);

        self.machine
            .selected_sub_view()
            .and_then(chat)
            .or_else(|| self.machine.selected_view().and_then(chat))
    }
}
