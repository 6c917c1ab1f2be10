//! Settings sections

use serde::{Deserialize, Serialize};

use crate::feed::DEFAULT_PAGE_SIZE;

/// Reaction ledger settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementSettings {
    /// Undo an optimistic reaction flip when its remote write fails.
    /// When false the local flip stays and is reported as pending.
    #[serde(default)]
    pub rollback_on_failure: bool,
}

/// Feed settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSettings {
    /// Posts loaded per feed page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}
