//! Generation endpoint abstraction
//!
//! Defines the transport seam used by the coordinator, the AiError type and
//! its classification into transient, quota and fatal failures.

use std::future::Future;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::request::GenerationRequest;

mod http;

pub use http::HttpTransport;

/// Errors that can occur while generating text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AiError {
    /// No endpoint configured
    #[error("AI not configured: {0}")]
    NotConfigured(String),

    /// Connection, DNS or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered with an error status
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// Body could not be read or encoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Response contained no usable text
    #[error("No content was generated")]
    EmptyResponse,

    /// Transient failures persisted through every retry
    #[error("Generation failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<AiError> },

    /// Request was cancelled
    #[error("Request cancelled")]
    Cancelled,
}

/// How a failure should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Overload, rate limit or network trouble; worth retrying
    Transient,
    /// Out of quota or credits; retrying cannot help
    Quota,
    /// Everything else
    Fatal,
}

const QUOTA_MARKERS: &[&str] = &["quota", "credit", "insufficient", "billing"];
const TRANSIENT_MARKERS: &[&str] = &[
    "overloaded",
    "rate limit",
    "rate_limit",
    "too many requests",
    "temporarily unavailable",
];

impl AiError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AiError::Network(message) => {
                if contains_any(message, QUOTA_MARKERS) {
                    ErrorClass::Quota
                } else {
                    ErrorClass::Transient
                }
            }
            AiError::Api { code, message } => {
                if contains_any(message, QUOTA_MARKERS) || *code == 402 {
                    ErrorClass::Quota
                } else if matches!(code, 429 | 502 | 503 | 504 | 529)
                    || contains_any(message, TRANSIENT_MARKERS)
                {
                    ErrorClass::Transient
                } else {
                    ErrorClass::Fatal
                }
            }
            AiError::RetriesExhausted { last, .. } => last.class(),
            _ => ErrorClass::Fatal,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.class() == ErrorClass::Transient
    }

    /// Message suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            AiError::Cancelled => "Generation cancelled".to_string(),
            AiError::EmptyResponse => "No content was generated. Try rephrasing the request.".to_string(),
            AiError::NotConfigured(_) => {
                "AI generation is not configured. Set [generation] endpoint in the config file.".to_string()
            }
            AiError::RetriesExhausted { attempts, .. } => format!(
                "The AI service is busy (tried {} times). Please try again in a moment.",
                attempts
            ),
            e if e.class() == ErrorClass::Quota => {
                "AI credits or quota exhausted. Generation is unavailable for now.".to_string()
            }
            e => format!("Generation failed: {}", e),
        }
    }
}

fn contains_any(message: &str, markers: &[&str]) -> bool {
    let lower = message.to_lowercase();
    markers.iter().any(|m| lower.contains(m))
}

/// Sends a generation request and returns the raw JSON body
///
/// Implementations must return `AiError::Cancelled` promptly once the token
/// is cancelled.
pub trait GenerationTransport {
    fn send(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<serde_json::Value, AiError>>;
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod provider_tests;
