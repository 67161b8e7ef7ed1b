// Configuration type definitions

use std::time::Duration;

use serde::Deserialize;

use super::generation_types::GenerationConfig;
use crate::ai::ProgressStage;
use crate::ai::context::DEFAULT_CONTEXT_WINDOW;
use crate::ai::progress::DEFAULT_STAGES;
use crate::history::{DEFAULT_HISTORY_DEBOUNCE_MS, DEFAULT_MAX_HISTORY};
use crate::streaming::DEFAULT_WORD_DELAY_MS;

fn default_max_size() -> usize {
    DEFAULT_MAX_HISTORY
}

fn default_debounce_ms() -> u64 {
    DEFAULT_HISTORY_DEBOUNCE_MS
}

fn default_word_delay_ms() -> u64 {
    DEFAULT_WORD_DELAY_MS
}

fn default_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}

fn default_stages() -> Vec<(u8, u64)> {
    DEFAULT_STAGES
        .iter()
        .map(|s| (s.percent, s.duration.as_millis() as u64))
        .collect()
}

/// Undo history configuration section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Quiet period before an edit is recorded
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            max_size: default_max_size(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Word-by-word reveal configuration section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamingConfig {
    #[serde(default = "default_word_delay_ms")]
    pub word_delay_ms: u64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            word_delay_ms: default_word_delay_ms(),
        }
    }
}

impl StreamingConfig {
    pub fn word_delay(&self) -> Duration {
        Duration::from_millis(self.word_delay_ms)
    }
}

/// Cursor context configuration section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContextConfig {
    /// Blocks before the cursor included as preceding context
    #[serde(default = "default_window")]
    pub window: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        ContextConfig {
            window: default_window(),
        }
    }
}

/// Synthetic progress configuration section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressConfig {
    /// `[percent, milliseconds]` pairs
    #[serde(default = "default_stages")]
    pub stages: Vec<(u8, u64)>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        ProgressConfig {
            stages: default_stages(),
        }
    }
}

impl ProgressConfig {
    pub fn stages(&self) -> Vec<ProgressStage> {
        self.stages.iter().copied().map(ProgressStage::from).collect()
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub streaming: StreamingConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
