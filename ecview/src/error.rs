//! Reasons a poll tick can be skipped. None of them are fatal to the viewer.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    /// The source returned a line that is not a usable sample.
    #[error("malformed sample: {0}")]
    Malformed(String),

    /// A later sample disagrees with the series count fixed by the first one.
    #[error("sample has {got} fields, expected {expected}")]
    CardinalityMismatch { expected: usize, got: usize },

    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] io::Error),
}

impl ReadError {
    /// Short label for the status line.
    pub fn kind(&self) -> &'static str {
        match self {
            ReadError::Malformed(_) => "malformed",
            ReadError::CardinalityMismatch { .. } => "cardinality",
            ReadError::SourceUnavailable(_) => "unavailable",
        }
    }
}
