//! draftwise library - AI writing assistance for block-structured documents
//!
//! The editor host owns rendering; this crate owns the document adapter,
//! undo history, cursor analysis, generation, streaming insertion and the
//! session that ties them together.

pub mod ai;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod notification;
pub mod revision;
pub mod session;
pub mod streaming;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use document::{Block, Document};
pub use error::DraftwiseError;
pub use session::{EditorSession, SessionError};
