//! Revision indicators attached to blocks
//!
//! At most one indicator per block: setting a new tag replaces the old one.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevisionTag {
    NeedsReview,
    AiGenerated,
    Modified,
    Suggested,
}

impl RevisionTag {
    pub fn as_str(self) -> &'static str {
        match self {
            RevisionTag::NeedsReview => "needs-review",
            RevisionTag::AiGenerated => "ai-generated",
            RevisionTag::Modified => "modified",
            RevisionTag::Suggested => "suggested",
        }
    }
}

impl fmt::Display for RevisionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionIndicator {
    pub tag: RevisionTag,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RevisionTracker {
    indicators: HashMap<String, RevisionIndicator>,
}

impl RevisionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a block, replacing any previous indicator
    pub fn set(&mut self, block_id: &str, tag: RevisionTag, reason: Option<String>) {
        log::debug!("Tagging block {} as {}", block_id, tag);
        self.indicators.insert(
            block_id.to_string(),
            RevisionIndicator {
                tag,
                timestamp: Utc::now(),
                reason,
            },
        );
    }

    pub fn get(&self, block_id: &str) -> Option<&RevisionIndicator> {
        self.indicators.get(block_id)
    }

    pub fn clear(&mut self, block_id: &str) -> Option<RevisionIndicator> {
        self.indicators.remove(block_id)
    }

    /// The user reviewed the block; its indicator goes away
    pub fn mark_reviewed(&mut self, block_id: &str) -> bool {
        self.clear(block_id).is_some()
    }

    /// Drop indicators of blocks no longer in the document
    pub fn retain_existing(&mut self, document: &Document) {
        self.indicators.retain(|id, _| document.contains(id));
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RevisionIndicator)> {
        self.indicators.iter().map(|(id, ind)| (id.as_str(), ind))
    }
}
