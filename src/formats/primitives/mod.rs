//! Shared primitives for line-oriented annotation formats.
//!
//! This module provides reusable infrastructure for tab-delimited formats:
//! - Record trait and the lookahead [`RecordStream`]
//! - Field parsing utilities
//! - Genomic types (intervals, strands)
//! - GFF3 percent-encoding
//!
//! # Example: Using Genomic Types
//!
//! ```
//! use gffload::formats::primitives::{GenomicInterval, Strand};
//! use std::str::FromStr;
//!
//! // Create an interval
//! let interval = GenomicInterval::new("chr1".to_string(), 100, 200)?;
//! assert_eq!(interval.length(), 100);
//!
//! // Parse strand
//! let strand = Strand::from_str("?")?;
//! assert_eq!(strand, Strand::Unknown);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use thiserror::Error;

pub mod escape;
pub mod fields;
pub mod genomic;
pub mod tab_delimited;

// Re-exports
pub use genomic::{GenomicInterval, Strand};
pub use tab_delimited::{RecordStream, StreamState, TabDelimitedRecord};

/// Errors that can occur when validating a single line.
///
/// Every variant is a malformed record. Line numbers are attached by the
/// stream that read the line (see [`crate::LoaderError::MalformedRecord`]).
#[derive(Debug, Error)]
pub enum FormatError {
    /// Invalid number of tab-delimited fields.
    #[error("Invalid number of fields: expected {expected}, got {actual}")]
    FieldCount {
        /// Expected number of fields
        expected: usize,
        /// Actual number of fields found
        actual: usize,
    },

    /// Invalid field value.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid genomic interval (start >= end).
    #[error("Invalid genomic interval: start {start} >= end {end}")]
    InvalidInterval {
        /// Start position
        start: u64,
        /// End position
        end: u64,
    },

    /// Invalid strand specification.
    #[error("Invalid strand: {0} (expected '+', '-', '.' or '?')")]
    InvalidStrand(String),

    /// Attribute group that is not `key=value`.
    #[error("Invalid attribute '{0}' (expected key=value)")]
    InvalidAttribute(String),

    /// Line bytes are not valid UTF-8.
    #[error("Line is not valid UTF-8")]
    InvalidEncoding,
}

/// Result type for format operations.
pub type Result<T> = std::result::Result<T, FormatError>;
