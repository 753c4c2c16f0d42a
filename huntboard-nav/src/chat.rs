use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effect::BrowserEffect;
use crate::model::{CHAT_VIEW_ID_SUFFIX, CHAT_VIEW_TITLE, Item, View};

const DEFAULT_COMPANY: &str = "Unknown Company";
const DEFAULT_STATUS: &str = "Active";

/// Metadata keys rendered by dedicated views instead of "Additional Info".
const RESERVED_METADATA_KEYS: [&str; 6] = [
    "company",
    "jobTitle",
    "status",
    "messageCount",
    "lastActivity",
    "attachments",
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// Conversation thread as listed by the chat collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationThread {
    pub id: String,
    #[serde(default)]
    pub resource_id: String,
    pub title: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub id: String,
    pub thread_id: String,
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationAttachment {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

fn bullet_list<I>(lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    lines
        .into_iter()
        .map(|line| format!("• {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_attachments(
    thread: &ConversationThread,
) -> Vec<ConversationAttachment> {
    let Some(raw) = thread.metadata.get("attachments") else {
        return Vec::new();
    };

    match serde_json::from_str(raw) {
        Ok(attachments) => attachments,
        Err(err) => {
            log::warn!(
                "thread {} has unreadable attachments: {err}",
                thread.id
            );
            Vec::new()
        },
    }
}

/// Build the browser item for a conversation thread.
///
/// The `Messages` view only exists when there is history; its id carries
/// the thread id so the chat collaborator can be bound to it.
pub fn thread_to_item(
    thread: &ConversationThread,
    messages: &[ConversationMessage],
) -> Item {
    let meta = |key: &str| {
        thread
            .metadata
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
    };
    let company = meta("company").unwrap_or_else(|| DEFAULT_COMPANY.into());
    let status = meta("status").unwrap_or_else(|| DEFAULT_STATUS.into());
    let message_count =
        meta("messageCount").unwrap_or_else(|| messages.len().to_string());

    let mut views = Vec::new();

    if !messages.is_empty() {
        let history = messages
            .iter()
            .map(|message| {
                let sender = match message.role {
                    ChatRole::User => "You",
                    _ => company.as_str(),
                };
                format!(
                    "[{}] {sender}: {}",
                    message.created_at, message.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        views.push(
            View::new(
                format!("{}{CHAT_VIEW_ID_SUFFIX}", thread.id),
                CHAT_VIEW_TITLE,
            )
            .with_description("View conversation history")
            .with_content(history),
        );
    }

    let mut info = vec![
        format!(
            "Started: {}",
            thread.created_at.as_deref().unwrap_or("Unknown")
        ),
        format!("Status: {status}"),
        format!("Message count: {message_count}"),
    ];
    if let Some(last_activity) = meta("lastActivity") {
        info.push(format!("Last activity: {last_activity}"));
    }
    if let Some(job_title) = meta("jobTitle") {
        info.push(format!("Related job: {job_title}"));
    }
    views.push(
        View::new(format!("{}-info", thread.id), "Thread Info")
            .with_description("Details about this conversation")
            .with_content(bullet_list(info)),
    );

    let attachments = parse_attachments(thread);
    if !attachments.is_empty() {
        let lines = attachments.iter().map(|attachment| {
            format!(
                "{} ({}, {})",
                attachment.name, attachment.kind, attachment.size
            )
        });
        views.push(
            View::new(format!("{}-attachments", thread.id), "Attachments")
                .with_description("Files and documents shared")
                .with_content(bullet_list(lines)),
        );
    }

    let extra = thread
        .metadata
        .iter()
        .filter(|(key, _)| !RESERVED_METADATA_KEYS.contains(&key.as_str()))
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>();
    if !extra.is_empty() {
        views.push(
            View::new(format!("{}-metadata", thread.id), "Additional Info")
                .with_description("Other conversation details")
                .with_content(bullet_list(extra)),
        );
    }

    Item::new(thread.id.clone(), thread.title.clone())
        .with_description(format!("{company} - {status}"))
        .with_metadata("company", company)
        .with_metadata("messageCount", format!("{message_count} messages"))
        .with_metadata("status", status)
        .with_views(views)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatStatus {
    /// No chat view selected.
    #[default]
    Idle,
    Loading,
    Ready,
    Streaming,
    Failed(String),
}

/// Chat state bound to the selected `Messages` view.
///
/// Every (re)binding bumps a generation; history and streamed replies that
/// carry an older generation or another thread are dropped.
#[derive(Debug, Default)]
pub struct ChatPanel {
    thread_id: Option<String>,
    generation: u64,
    messages: Vec<ConversationMessage>,
    draft: Option<String>,
    status: ChatStatus,
    local_sequence: u64,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Assistant text streamed so far for the reply in flight.
    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    pub fn status(&self) -> &ChatStatus {
        &self.status
    }

    /// Bind the panel to a thread, or unbind it with `None`.
    pub fn open(&mut self, thread_id: Option<&str>) -> Vec<BrowserEffect> {
        if self.thread_id.as_deref() == thread_id {
            return Vec::new();
        }

        self.generation += 1;
        self.thread_id = thread_id.map(str::to_string);
        self.messages.clear();
        self.draft = None;

        match thread_id {
            Some(thread_id) => {
                self.status = ChatStatus::Loading;
                vec![BrowserEffect::FetchChatHistory {
                    thread_id: thread_id.to_string(),
                    generation: self.generation,
                }]
            },
            None => {
                self.status = ChatStatus::Idle;
                Vec::new()
            },
        }
    }

    pub fn history_loaded(
        &mut self,
        thread_id: &str,
        generation: u64,
        messages: Vec<ConversationMessage>,
    ) -> bool {
        if !self.accepts(thread_id, generation, "history") {
            return false;
        }

        self.messages = messages;
        self.status = ChatStatus::Ready;
        true
    }

    pub fn history_failed(
        &mut self,
        thread_id: &str,
        generation: u64,
        message: String,
    ) -> bool {
        if !self.accepts(thread_id, generation, "history failure") {
            return false;
        }

        log::warn!("chat history for {thread_id} failed: {message}");
        self.messages.clear();
        self.status = ChatStatus::Failed(message);
        true
    }

    /// Append a user message and ask the collaborator for a reply.
    pub fn send(&mut self, text: &str) -> Vec<BrowserEffect> {
        let text = text.trim();
        let Some(thread_id) = self.thread_id.clone() else {
            log::warn!("ignored chat message without a bound thread");
            return Vec::new();
        };
        if text.is_empty() || self.draft.is_some() {
            return Vec::new();
        }

        self.local_sequence += 1;
        self.messages.push(ConversationMessage {
            id: format!("local-{}", self.local_sequence),
            thread_id: thread_id.clone(),
            role: ChatRole::User,
            content: text.to_string(),
            created_at: String::new(),
        });
        self.draft = Some(String::new());
        self.status = ChatStatus::Streaming;

        vec![BrowserEffect::SendChatMessage {
            thread_id,
            generation: self.generation,
            text: text.to_string(),
        }]
    }

    pub fn chunk(&mut self, thread_id: &str, generation: u64, text: &str) {
        if !self.accepts(thread_id, generation, "reply chunk") {
            return;
        }

        if let Some(draft) = self.draft.as_mut() {
            draft.push_str(text);
        }
    }

    pub fn finished(&mut self, thread_id: &str, generation: u64) {
        if !self.accepts(thread_id, generation, "reply end") {
            return;
        }

        let Some(content) = self.draft.take() else {
            return;
        };
        self.local_sequence += 1;
        self.messages.push(ConversationMessage {
            id: format!("local-{}", self.local_sequence),
            thread_id: thread_id.to_string(),
            role: ChatRole::Assistant,
            content,
            created_at: String::new(),
        });
        self.status = ChatStatus::Ready;
    }

    pub fn failed(
        &mut self,
        thread_id: &str,
        generation: u64,
        message: String,
    ) {
        if !self.accepts(thread_id, generation, "reply failure") {
            return;
        }

        log::warn!("chat reply for {thread_id} failed: {message}");
        self.draft = None;
        self.status = ChatStatus::Failed(message);
    }

    fn accepts(&self, thread_id: &str, generation: u64, what: &str) -> bool {
        let current = self.thread_id.as_deref() == Some(thread_id)
            && self.generation == generation;
        if !current {
            log::debug!(
                "dropping stale chat {what} for {thread_id} (generation \
                 {generation}, current {})",
                self.generation
            );
        }
        current
    }
}
