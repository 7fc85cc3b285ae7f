//! Codec error types

use thiserror::Error;

/// Result type alias for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Codec-specific error types
#[derive(Error, Debug)]
pub enum CodecError {
    #[error(transparent)]
    Graph(#[from] gpga_core::Error),

    #[error("Syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}

/// Failure to decode one block of a corpus
#[derive(Error, Debug)]
#[error("Sentence {index}: {source}")]
pub struct SentenceError {
    pub index: usize,
    pub source: CodecError,
}
