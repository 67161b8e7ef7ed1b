//! HTTP transport for the chat endpoint
//!
//! POSTs the request as JSON and returns the parsed body. Plain-text bodies
//! are wrapped as `{"answer": text}` so the response adapter can treat every
//! backend the same way. Uses reqwest for HTTP and races the request against
//! the cancellation token.

use reqwest::Client;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{AiError, GenerationTransport};
use crate::ai::request::GenerationRequest;

/// JSON-over-HTTP client for the generation endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &GenerationRequest) -> Result<Value, AiError> {
        let body = serde_json::to_string(request).map_err(|e| AiError::Parse(e.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(AiError::Api {
                code: status.as_u16(),
                message: error_message(&text),
            });
        }

        Ok(parse_body(&text))
    }
}

impl GenerationTransport for HttpTransport {
    async fn send(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, AiError> {
        if cancel.is_cancelled() {
            return Err(AiError::Cancelled);
        }

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                log::debug!("Generation request cancelled in flight");
                Err(AiError::Cancelled)
            }

            result = self.post(request) => result,
        }
    }
}

/// Parse a success body, wrapping plain text as an answer
fn parse_body(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(value) if value.is_object() => value,
        _ => serde_json::json!({ "answer": text }),
    }
}

/// Pull a readable message out of an error body
fn error_message(text: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return if text.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            text.trim().to_string()
        };
    };

    ["error", "message", "detail"]
        .iter()
        .find_map(|key| {
            let field = value.get(key)?;
            field
                .as_str()
                .map(str::to_string)
                .or_else(|| field.get("message")?.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| text.to_string())
}
