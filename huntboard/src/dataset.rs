use std::fs;
use std::path::Path;

use huntboard_nav::{
    ChatRole, CollectionContext, ConversationMessage, ConversationThread,
    Domain, Item, Job, JobSearch, thread_to_item,
};
use serde::{Deserialize, Serialize};

use crate::errors::HostError;

/// Conversation thread together with its history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Conversation {
    pub(crate) thread: ConversationThread,
    #[serde(default)]
    pub(crate) messages: Vec<ConversationMessage>,
}

/// In-memory stand-in for the item and chat collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Dataset {
    #[serde(default)]
    pub(crate) job_searches: Vec<JobSearch>,
    #[serde(default)]
    pub(crate) conversations: Vec<Conversation>,
    #[serde(skip)]
    next_id: u64,
}

impl Dataset {
    pub(crate) fn load(path: &Path) -> Result<Self, HostError> {
        let data =
            fs::read_to_string(path).map_err(|source| HostError::DatasetIo {
                path: path.display().to_string(),
                source,
            })?;

        Self::parse(&data).map_err(|source| HostError::DatasetJson {
            path: path.display().to_string(),
            source,
        })
    }

    pub(crate) fn parse(data: &str) -> Result<Self, serde_json::Error> {
        let mut dataset: Dataset = serde_json::from_str(data)?;
        huntboard_nav::sort_newest_first(&mut dataset.job_searches);
        Ok(dataset)
    }

    /// Newest job search, used as the initial collection.
    pub(crate) fn first_context(&self) -> CollectionContext {
        match self.job_searches.first() {
            Some(search) => CollectionContext::job_search(search.id.clone()),
            None => CollectionContext::threads(),
        }
    }

    /// Items of a collection, or the reason they cannot be listed.
    pub(crate) fn items(
        &self,
        context: &CollectionContext,
    ) -> Result<Vec<Item>, String> {
        match context.domain {
            Domain::Jobs => {
                let search = self.job_search(context)?;
                Ok(search.items())
            },
            Domain::Threads => Ok(self
                .conversations
                .iter()
                .map(|conversation| {
                    thread_to_item(&conversation.thread, &conversation.messages)
                })
                .collect()),
        }
    }

    /// Add an item to a collection and return its id.
    pub(crate) fn create(
        &mut self,
        context: &CollectionContext,
        title: &str,
    ) -> Result<String, String> {
        self.next_id += 1;
        match context.domain {
            Domain::Jobs => {
                let id = format!("job-new-{}", self.next_id);
                let search = self.job_search_mut(context)?;
                search.jobs.insert(
                    0,
                    Job {
                        id: id.clone(),
                        title: title.to_string(),
                        ..Job::default()
                    },
                );
                Ok(id)
            },
            Domain::Threads => {
                let id = format!("thread-new-{}", self.next_id);
                self.conversations.insert(
                    0,
                    Conversation {
                        thread: ConversationThread {
                            id: id.clone(),
                            title: title.to_string(),
                            ..ConversationThread::default()
                        },
                        messages: Vec::new(),
                    },
                );
                Ok(id)
            },
        }
    }

    /// Remove an item from a collection.
    pub(crate) fn delete(
        &mut self,
        context: &CollectionContext,
        id: &str,
    ) -> Result<(), String> {
        let removed = match context.domain {
            Domain::Jobs => {
                let search = self.job_search_mut(context)?;
                let before = search.jobs.len();
                search.jobs.retain(|job| job.id != id);
                before != search.jobs.len()
            },
            Domain::Threads => {
                let before = self.conversations.len();
                self.conversations
                    .retain(|conversation| conversation.thread.id != id);
                before != self.conversations.len()
            },
        };

        if removed {
            Ok(())
        } else {
            Err(format!("no item {id} in {context}"))
        }
    }

    pub(crate) fn history(
        &self,
        thread_id: &str,
    ) -> Result<Vec<ConversationMessage>, String> {
        self.conversation(thread_id)
            .map(|conversation| conversation.messages.clone())
            .ok_or_else(|| format!("no conversation {thread_id}"))
    }

    /// Store a message exchange in a thread's history.
    pub(crate) fn append(
        &mut self,
        thread_id: &str,
        role: ChatRole,
        content: &str,
    ) {
        self.next_id += 1;
        let id = format!("message-{}", self.next_id);
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.thread.id == thread_id)
        else {
            log::warn!("dropping message for unknown thread {thread_id}");
            return;
        };

        conversation.messages.push(ConversationMessage {
            id,
            thread_id: thread_id.to_string(),
            role,
            content: content.to_string(),
            created_at: String::new(),
        });
    }

    pub(crate) fn conversation(
        &self,
        thread_id: &str,
    ) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|conversation| conversation.thread.id == thread_id)
    }

    fn job_search(
        &self,
        context: &CollectionContext,
    ) -> Result<&JobSearch, String> {
        let search_id = context.collection_id.as_deref().unwrap_or_default();
        self.job_searches
            .iter()
            .find(|search| search.id == search_id)
            .ok_or_else(|| format!("job search {search_id} not found"))
    }

    fn job_search_mut(
        &mut self,
        context: &CollectionContext,
    ) -> Result<&mut JobSearch, String> {
        let search_id = context.collection_id.as_deref().unwrap_or_default();
        self.job_searches
            .iter_mut()
            .find(|search| search.id == search_id)
            .ok_or_else(|| format!("job search {search_id} not found"))
    }
}
