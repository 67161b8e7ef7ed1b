use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentError;
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum DraftwiseError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid document: {0}")]
    Document(#[from] DocumentError),

    #[error("Cursor block not found: {0}")]
    CursorNotFound(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
