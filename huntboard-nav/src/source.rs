use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Item, View};

/// Data domain the browser is displaying.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    #[default]
    Jobs,
    Threads,
}

impl Domain {
    /// The domain whose externally owned id must be cleared when this one
    /// becomes active.
    pub fn other(self) -> Self {
        match self {
            Domain::Jobs => Domain::Threads,
            Domain::Threads => Domain::Jobs,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Jobs => f.write_str("jobs"),
            Domain::Threads => f.write_str("threads"),
        }
    }
}

/// Identity of the parent collection being browsed.
///
/// Re-fetching the same context keeps the selection; switching to a
/// different context resets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CollectionContext {
    pub domain: Domain,
    pub collection_id: Option<String>,
}

impl CollectionContext {
    /// Jobs of one job search.
    pub fn job_search(search_id: impl Into<String>) -> Self {
        Self {
            domain: Domain::Jobs,
            collection_id: Some(search_id.into()),
        }
    }

    /// Every conversation thread.
    pub fn threads() -> Self {
        Self {
            domain: Domain::Threads,
            collection_id: None,
        }
    }
}

impl fmt::Display for CollectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.collection_id {
            Some(collection_id) => write!(f, "{}/{collection_id}", self.domain),
            None => write!(f, "{}", self.domain),
        }
    }
}

/// Flat view row as stored by the item source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    pub id: String,
    #[serde(default)]
    pub parent_view_id: Option<String>,
    #[serde(default = "default_order")]
    pub order: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
}

fn default_order() -> String {
    String::from("0")
}

/// Nest flat view rows under their parents.
///
/// Rows are ordered by their numeric `order`; rows whose order does not
/// parse keep their relative position after every numbered row. Rows that
/// point at an unknown parent are dropped.
pub fn build_view_hierarchy(records: Vec<ViewRecord>) -> Vec<View> {
    let mut records = records;
    records.sort_by_key(|record| {
        let order = record.order.trim().parse::<i64>().ok();
        (order.is_none(), order)
    });

    let known: HashSet<String> =
        records.iter().map(|record| record.id.clone()).collect();

    let mut children: HashMap<String, Vec<ViewRecord>> = HashMap::new();
    let mut roots = Vec::new();
    for record in records {
        match record.parent_view_id.clone() {
            Some(parent_id) if known.contains(&parent_id) => {
                children.entry(parent_id).or_default().push(record);
            },
            Some(parent_id) => {
                log::debug!(
                    "dropping view {} with unknown parent {parent_id}",
                    record.id
                );
            },
            None => roots.push(record),
        }
    }

    roots
        .into_iter()
        .map(|record| attach_children(record, &mut children))
        .collect()
}

fn attach_children(
    record: ViewRecord,
    children: &mut HashMap<String, Vec<ViewRecord>>,
) -> View {
    let sub_views = children
        .remove(&record.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach_children(child, children))
        .collect();

    View::new(record.id, record.title)
        .with_description(record.description)
        .with_content(record.content)
        .with_sub_views(sub_views)
}

/// Job posting as returned by the job source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub description: String,
    /// Flat rows, nested by `build_view_hierarchy` on conversion.
    #[serde(default)]
    pub views: Vec<ViewRecord>,
}

impl From<Job> for Item {
    fn from(job: Job) -> Self {
        Item::new(job.id, job.title)
            .with_description(job.description)
            .with_metadata("company", job.company)
            .with_metadata("location", job.location)
            .with_metadata("salary", job.salary)
            .with_views(build_view_hierarchy(job.views))
    }
}

/// Parent collection of jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearch {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl JobSearch {
    /// Jobs of this search as browser items, in source order.
    pub fn items(&self) -> Vec<Item> {
        self.jobs.iter().cloned().map(Item::from).collect()
    }
}

/// Sort job searches newest first.
pub fn sort_newest_first(searches: &mut [JobSearch]) {
    searches.sort_by_key(|search| Reverse(search.created_at));
}
