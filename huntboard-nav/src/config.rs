use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::MetadataField;
use crate::source::Domain;

const DEFAULT_LEAVE_SETTLE_MS: u64 = 300;
const DEFAULT_LIST_LEAVE_CLEAR_MS: u64 = 100;
const DEFAULT_BACK_GUARD_RELEASE_MS: u64 = 600;

/// Viewport width (px) from which panes are laid out side by side.
pub const DEFAULT_BREAKPOINT: f32 = 768.0;

/// Delays used to sequence back navigation with scroll animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationTiming {
    /// Between starting a back-scroll and clearing the deeper levels.
    pub leave_settle_ms: u64,
    /// Between starting the scroll to the list and clearing the path.
    pub list_leave_clear_ms: u64,
    /// How long the back-to-list guard and snap suspension last.
    pub back_guard_release_ms: u64,
}

impl Default for NavigationTiming {
    fn default() -> Self {
        Self {
            leave_settle_ms: DEFAULT_LEAVE_SETTLE_MS,
            list_leave_clear_ms: DEFAULT_LIST_LEAVE_CLEAR_MS,
            back_guard_release_ms: DEFAULT_BACK_GUARD_RELEASE_MS,
        }
    }
}

impl NavigationTiming {
    pub fn leave_settle(&self) -> Duration {
        Duration::from_millis(self.leave_settle_ms)
    }

    pub fn list_leave_clear(&self) -> Duration {
        Duration::from_millis(self.list_leave_clear_ms)
    }

    pub fn back_guard_release(&self) -> Duration {
        Duration::from_millis(self.back_guard_release_ms)
    }
}

/// User-facing strings of one browser instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserLabels {
    pub list_title: String,
    pub list_count: String,
    pub back_to_list: String,
    pub back_to_detail: String,
    pub no_item_selected: String,
    pub select_prompt: String,
    pub more_info: String,
    pub more_details: String,
}

/// Configuration of one browser instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    pub labels: BrowserLabels,
    #[serde(default)]
    pub metadata_fields: Vec<MetadataField>,
    /// Key under which the panel widths are persisted.
    pub storage_key: String,
    #[serde(default)]
    pub timing: NavigationTiming,
    #[serde(default = "default_breakpoint")]
    pub breakpoint: f32,
}

fn default_breakpoint() -> f32 {
    DEFAULT_BREAKPOINT
}

impl BrowserConfig {
    /// Job search browser.
    pub fn jobs() -> Self {
        Self {
            labels: BrowserLabels {
                list_title: String::from("Jobs"),
                list_count: String::from("jobs"),
                back_to_list: String::from("Back to Jobs"),
                back_to_detail: String::from("Back to Job"),
                no_item_selected: String::from("No job selected"),
                select_prompt: String::from(
                    "Select a job from the list to view details",
                ),
                more_info: String::from("More Info"),
                more_details: String::from("More Details"),
            },
            metadata_fields: vec![
                MetadataField::new("company"),
                MetadataField::new("location").with_separator("•"),
                MetadataField::new("salary").with_separator("•"),
            ],
            storage_key: String::from("job-browser-panels"),
            timing: NavigationTiming::default(),
            breakpoint: DEFAULT_BREAKPOINT,
        }
    }

    /// Conversation thread browser.
    pub fn threads() -> Self {
        Self {
            labels: BrowserLabels {
                list_title: String::from("Conversations"),
                list_count: String::from("threads"),
                back_to_list: String::from("Back to Conversations"),
                back_to_detail: String::from("Back to Thread"),
                no_item_selected: String::from("No conversation selected"),
                select_prompt: String::from(
                    "Select a conversation from the list to view details",
                ),
                more_info: String::from("More Info"),
                more_details: String::from("More Details"),
            },
            metadata_fields: vec![
                MetadataField::new("company"),
                MetadataField::new("messageCount"),
                MetadataField::new("status").with_separator("•"),
            ],
            storage_key: String::from("thread-browser-panels"),
            timing: NavigationTiming::default(),
            breakpoint: DEFAULT_BREAKPOINT,
        }
    }

    pub fn with_timing(mut self, timing: NavigationTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_breakpoint(mut self, breakpoint: f32) -> Self {
        self.breakpoint = breakpoint;
        self
    }
}

/// Per-domain configuration of a browser that can switch domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfigs {
    pub jobs: BrowserConfig,
    pub threads: BrowserConfig,
}

impl Default for DomainConfigs {
    fn default() -> Self {
        Self {
            jobs: BrowserConfig::jobs(),
            threads: BrowserConfig::threads(),
        }
    }
}

impl DomainConfigs {
    pub fn get(&self, domain: Domain) -> &BrowserConfig {
        match domain {
            Domain::Jobs => &self.jobs,
            Domain::Threads => &self.threads,
        }
    }

    /// Apply the same timing to every domain.
    pub fn with_timing(mut self, timing: NavigationTiming) -> Self {
        self.jobs.timing = timing;
        self.threads.timing = timing;
        self
    }
}
