//! AI generation for draftwise
//!
//! Turns the cursor position into a prompt, sends it to the chat endpoint
//! with retry and synthetic progress, and cleans the answer for insertion.

pub mod context;
pub mod coordinator;
pub mod progress;
pub mod prompt;
pub mod provider;
pub mod request;
pub mod response;
pub mod retry;

pub use context::{ContextType, CursorContext, HeadingInfo, analyze, analyze_with_window};
pub use coordinator::GenerationCoordinator;
pub use progress::{DEFAULT_STAGES, ProgressStage};
pub use prompt::{Behavior, build_prompt};
pub use provider::{AiError, ErrorClass, GenerationTransport, HttpTransport};
pub use request::{ContextAnchors, GenerationRequest, RequestMode};
pub use retry::RetryPolicy;
