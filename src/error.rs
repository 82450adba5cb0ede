//! Error types for gffload

use crate::formats::primitives::FormatError;
use crate::store::StoreError;
use thiserror::Error;

/// Result type alias for gffload operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that abort a conversion run.
///
/// Every variant is fatal: nothing in this crate logs a failure and carries on.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A GFF3 line failed column-count or field-format validation
    #[error("Malformed GFF3 record at line {line}: {source}")]
    MalformedRecord {
        /// Line number (1-based) of the offending line
        line: usize,
        /// What was wrong with it
        source: FormatError,
    },

    /// The underlying line source failed while reading
    #[error("Failed to read line source after line {line}: {source}")]
    SourceRead {
        /// Last line number successfully read
        line: usize,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// `next_record()` was called on a stream with no records left
    #[error("Record stream is exhausted")]
    ExhaustedStream,

    /// The store sink rejected an entity
    #[error("Failed to store {class_name} with key '{key}': {source}")]
    Persistence {
        /// Class of the entity being stored
        class_name: String,
        /// Logical key (name, title, taxon id, ...) of the entity
        key: String,
        /// Error reported by the store
        source: StoreError,
    },

    /// The store sink failed while opening or closing
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid loader configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error outside of record streaming (opening files, writing output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoaderError {
    /// Line number associated with this error, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoaderError::MalformedRecord { line, .. } | LoaderError::SourceRead { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }
}
