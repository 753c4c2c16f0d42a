use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use huntboard_nav::{
    Browser, BrowserEffect, BrowserEvent, ChatRole, CollectionContext,
    DeferredQueue, Domain, DomainConfigs, LayoutStore, SyncMode,
};

use crate::command::Command;
use crate::dataset::Dataset;
use crate::settings::HostSettings;

/// Ids the embedding parent currently owns, one per domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParentSelection {
    pub(crate) jobs: Option<String>,
    pub(crate) threads: Option<String>,
}

impl ParentSelection {
    fn slot_mut(&mut self, domain: Domain) -> &mut Option<String> {
        match domain {
            Domain::Jobs => &mut self.jobs,
            Domain::Threads => &mut self.threads,
        }
    }
}

/// Headless host: performs browser effects against the in-memory dataset
/// and a virtual clock.
pub(crate) struct Host {
    browser: Browser,
    clock: DeferredQueue,
    dataset: Dataset,
    parent: ParentSelection,
    reply_chunk_words: usize,
    notes: Vec<String>,
}

impl Host {
    pub(crate) fn new(
        dataset: Dataset,
        settings: &HostSettings,
        store: Rc<RefCell<dyn LayoutStore>>,
    ) -> Self {
        let mode = if settings.standalone {
            SyncMode::Standalone
        } else {
            SyncMode::Controlled
        };
        let context = dataset.first_context();
        let configs = DomainConfigs::default().with_timing(settings.timing);
        let browser = Browser::new(
            configs,
            store,
            mode,
            context,
            settings.viewport_width,
        );

        let mut host = Self {
            browser,
            clock: DeferredQueue::new(),
            dataset,
            parent: ParentSelection::default(),
            reply_chunk_words: settings.reply_chunk_words.max(1),
            notes: Vec::new(),
        };
        let mounted = host.browser.mount();
        host.perform_all(mounted);
        host
    }

    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    pub(crate) fn parent(&self) -> &ParentSelection {
        &self.parent
    }

    pub(crate) fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Side effects observed since the last call, in order.
    pub(crate) fn take_notes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notes)
    }

    /// Run one command. Display-only commands are left to the caller.
    pub(crate) fn run(&mut self, command: Command) {
        match command {
            Command::Item(id) => self.dispatch(BrowserEvent::ItemPressed(id)),
            Command::View(id) => self.dispatch(BrowserEvent::ViewPressed(id)),
            Command::SubView(id) => {
                self.dispatch(BrowserEvent::SubViewPressed(id));
            },
            Command::Back => self.dispatch(BrowserEvent::BackPressed),
            Command::List => self.dispatch(BrowserEvent::BackToList),
            Command::Wait(millis) => self.advance(millis),
            Command::Width(width) => {
                self.dispatch(BrowserEvent::ViewportResized { width });
            },
            Command::Left(percent) => {
                self.dispatch(BrowserEvent::LeftPaneResized(percent));
            },
            Command::Right(percent) => {
                self.dispatch(BrowserEvent::RightPaneResized(percent));
            },
            Command::Jobs(search_id) => self.dispatch(
                BrowserEvent::CollectionChanged(CollectionContext::job_search(
                    search_id,
                )),
            ),
            Command::Threads => self.dispatch(BrowserEvent::CollectionChanged(
                CollectionContext::threads(),
            )),
            Command::External(id) => {
                if self.browser.sync().mode() == SyncMode::Standalone {
                    self.note(String::from(
                        "standalone browser has no parent selection",
                    ));
                    return;
                }
                let domain = self.browser.context().domain;
                self.parent.slot_mut(domain).clone_from(&id);
                self.dispatch(BrowserEvent::ExternalIdChanged { domain, id });
            },
            Command::Create(title) => self.create(&title),
            Command::Delete(id) => self.delete(&id),
            Command::Say(text) => {
                self.dispatch(BrowserEvent::ChatSendRequested { text });
            },
            Command::Refresh => self.dispatch(BrowserEvent::Refresh),
            Command::Show | Command::Help | Command::Quit => {},
        }
    }

    /// Advance the virtual clock and deliver every due token.
    pub(crate) fn advance(&mut self, millis: u64) {
        let due = self.clock.advance(Duration::from_millis(millis));
        for token in due {
            self.dispatch(BrowserEvent::DeferredElapsed { token });
        }
    }

    fn create(&mut self, title: &str) {
        let context = self.browser.context().clone();
        let event = match self.dataset.create(&context, title) {
            Ok(id) => BrowserEvent::ItemCreated { id },
            Err(message) => BrowserEvent::ItemMutationFailed { message },
        };
        self.dispatch(event);
    }

    fn delete(&mut self, id: &str) {
        let context = self.browser.context().clone();
        let event = match self.dataset.delete(&context, id) {
            Ok(()) => BrowserEvent::ItemDeleted { id: id.to_string() },
            Err(message) => BrowserEvent::ItemMutationFailed { message },
        };
        self.dispatch(event);
    }

    /// Reduce an event and every event its effects produce.
    fn dispatch(&mut self, event: BrowserEvent) {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            let effects = self.browser.reduce(event);
            self.clock.absorb(&effects);
            for effect in effects {
                self.perform(effect, &mut queue);
            }
        }
    }

    fn perform_all(&mut self, effects: Vec<BrowserEffect>) {
        let mut queue = VecDeque::new();
        self.clock.absorb(&effects);
        for effect in effects {
            self.perform(effect, &mut queue);
        }
        while let Some(event) = queue.pop_front() {
            self.dispatch(event);
        }
    }

    fn perform(
        &mut self,
        effect: BrowserEffect,
        queue: &mut VecDeque<BrowserEvent>,
    ) {
        match effect {
            BrowserEffect::ScrollTo { page, behavior } => {
                self.note(format!("scroll {page:?} ({behavior:?})"));
            },
            BrowserEffect::SetSnapEnabled(enabled) => {
                let state = if enabled { "on" } else { "off" };
                self.note(format!("snap {state}"));
            },
            BrowserEffect::Schedule { token, after } => {
                log::debug!("timer {token:?} in {after:?}");
            },
            BrowserEffect::Cancel { token } => {
                log::debug!("timer {token:?} cancelled");
            },
            BrowserEffect::PublishSelectedId { domain, id } => {
                self.note(format!(
                    "parent {domain} id = {}",
                    id.as_deref().unwrap_or("-")
                ));
                self.parent.slot_mut(domain).clone_from(&id);
                queue.push_back(BrowserEvent::ExternalIdChanged { domain, id });
            },
            BrowserEffect::LayoutChanged { left, right } => {
                self.note(format!("panes left {left}% right {right}%"));
            },
            BrowserEffect::FetchItems {
                context,
                generation,
            } => {
                let event = match self.dataset.items(&context) {
                    Ok(items) => {
                        BrowserEvent::ItemsLoaded { generation, items }
                    },
                    Err(message) => BrowserEvent::ItemsLoadFailed {
                        generation,
                        message,
                    },
                };
                queue.push_back(event);
            },
            BrowserEffect::FetchChatHistory {
                thread_id,
                generation,
            } => {
                let event = match self.dataset.history(&thread_id) {
                    Ok(messages) => BrowserEvent::ChatHistoryLoaded {
                        thread_id,
                        generation,
                        messages,
                    },
                    Err(message) => BrowserEvent::ChatHistoryFailed {
                        thread_id,
                        generation,
                        message,
                    },
                };
                queue.push_back(event);
            },
            BrowserEffect::SendChatMessage {
                thread_id,
                generation,
                text,
            } => {
                self.dataset.append(&thread_id, ChatRole::User, &text);
                let reply = self.reply_to(&thread_id, &text);
                self.dataset.append(&thread_id, ChatRole::Assistant, &reply);

                for chunk in chunk_words(&reply, self.reply_chunk_words) {
                    queue.push_back(BrowserEvent::ChatChunk {
                        thread_id: thread_id.clone(),
                        generation,
                        text: chunk,
                    });
                }
                queue.push_back(BrowserEvent::ChatFinished {
                    thread_id,
                    generation,
                });
            },
        }
    }

    fn reply_to(&self, thread_id: &str, text: &str) -> String {
        let company = self
            .dataset
            .conversation(thread_id)
            .and_then(|conversation| {
                conversation.thread.metadata.get("company").cloned()
            })
            .unwrap_or_else(|| String::from("The team"));

        format!("{company} received \"{text}\" and will follow up soon.")
    }

    fn note(&mut self, line: String) {
        log::debug!("{line}");
        self.notes.push(line);
    }
}

/// Split a reply into streamed chunks of `size` words, keeping spacing.
fn chunk_words(text: &str, size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(size)
        .enumerate()
        .map(|(index, chunk)| {
            let joined = chunk.join(" ");
            if index == 0 {
                joined
            } else {
                format!(" {joined}")
            }
        })
        .collect()
}
