use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Title that tags a view as the chat panel of its conversation thread.
pub const CHAT_VIEW_TITLE: &str = "Messages";

/// Suffix carried by chat view ids (`{thread_id}-messages`).
pub const CHAT_VIEW_ID_SUFFIX: &str = "-messages";

/// Detail panel attached to an item.
///
/// Sub-views have exactly the same shape one level deeper, so the type is
/// recursive. Only three levels get a dedicated pane; deeper nesting is kept
/// in the data but never selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_views: Vec<View>,
}

impl View {
    /// Create a view with empty description and content.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_sub_views(mut self, sub_views: Vec<View>) -> Self {
        self.sub_views = sub_views;
        self
    }

    /// Return whether the view delegates its body to the chat collaborator.
    pub fn is_chat_view(&self) -> bool {
        self.title == CHAT_VIEW_TITLE
    }

    /// Return the conversation thread bound to a chat view.
    pub fn chat_thread_id(&self) -> Option<&str> {
        if !self.is_chat_view() {
            return None;
        }

        Some(thread_id_from_view_id(&self.id))
    }
}

/// Views are the same entity when their ids match, whatever their content.
impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for View {}

impl Hash for View {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Top-level selectable entity (a job posting or a conversation thread).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub views: Vec<View>,
}

impl Item {
    /// Create an item without metadata or views.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_views(mut self, views: Vec<View>) -> Self {
        self.views = views;
        self
    }
}

/// Items are compared by id: a re-fetched item is still the same item.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Find an item by id in the current sequence.
pub fn find_item<'a>(items: &'a [Item], item_id: &str) -> Option<&'a Item> {
    items.iter().find(|item| item.id == item_id)
}

/// Find one of the item's views by id.
pub fn find_view<'a>(item: &'a Item, view_id: &str) -> Option<&'a View> {
    item.views.iter().find(|view| view.id == view_id)
}

/// Find one of the view's sub-views by id.
pub fn find_sub_view<'a>(
    view: &'a View,
    sub_view_id: &str,
) -> Option<&'a View> {
    view.sub_views
        .iter()
        .find(|sub_view| sub_view.id == sub_view_id)
}

/// Strip the chat suffix from a view id. Ids without it are returned as is.
pub fn thread_id_from_view_id(view_id: &str) -> &str {
    view_id
        .strip_suffix(CHAT_VIEW_ID_SUFFIX)
        .unwrap_or(view_id)
}

/// Metadata key rendered in list rows and item headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}

impl MetadataField {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            separator: None,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }
}

/// Rendered metadata: a headline plus a single detail line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSummary {
    pub headline: String,
    pub details: String,
}

/// Render an item's metadata according to the configured field order.
///
/// The first field is the headline. Remaining fields form the detail line,
/// and every field after the first of them is prefixed by its separator.
/// Missing keys render as empty strings.
pub fn metadata_summary(
    item: &Item,
    fields: &[MetadataField],
) -> Option<MetadataSummary> {
    let (head, rest) = fields.split_first()?;
    let value_of = |field: &MetadataField| {
        item.metadata.get(&field.key).cloned().unwrap_or_default()
    };

    let details = rest
        .iter()
        .enumerate()
        .map(|(index, field)| match field.separator.as_deref() {
            Some(separator) if index > 0 => {
                format!("{separator} {}", value_of(field))
            },
            _ => value_of(field),
        })
        .collect::<Vec<_>>()
        .join(" ");

    Some(MetadataSummary {
        headline: value_of(head),
        details,
    })
}
