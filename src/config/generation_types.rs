// Generation configuration type definitions

use std::time::Duration;

use serde::Deserialize;

use crate::ai::RetryPolicy;
use crate::ai::retry::{DEFAULT_BACKOFF_BASE_MS, DEFAULT_MAX_RETRIES};

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_backoff_base_ms() -> u64 {
    DEFAULT_BACKOFF_BASE_MS
}

/// Generation endpoint configuration section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationConfig {
    /// Chat endpoint URL; generation is disabled without one
    pub endpoint: Option<String>,
    /// Session identifier sent with every request (random when absent)
    pub session_id: Option<String>,
    /// Retries after the first attempt for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Ask the endpoint to search the web
    #[serde(default)]
    pub force_web: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            endpoint: None,
            session_id: None,
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            force_web: false,
        }
    }
}

impl GenerationConfig {
    /// Endpoint, if one is set and non-blank
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint().is_some()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.backoff_base_ms),
        )
    }

    /// Configured session id, or a fresh uuid
    pub fn session_id(&self) -> String {
        self.session_id
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
#[path = "generation_types_tests.rs"]
mod generation_types_tests;
