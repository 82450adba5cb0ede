//! Output destinations for streaming writes
//!
//! `DataSink` is the write counterpart to [`crate::io::DataSource`]: GFF3
//! writers and JSON-lines item stores are agnostic to where their bytes go.
//!
//! ```no_run
//! use gffload::io::DataSink;
//!
//! let sink = DataSink::from_path("items.jsonl.gz");
//! assert!(sink.is_compressed());
//!
//! let sink = DataSink::stdout();
//! ```

use std::path::{Path, PathBuf};

/// Output destination for streaming writes
#[derive(Debug, Clone)]
pub enum DataSink {
    /// Write to a local file path
    ///
    /// Compression is chosen from the file extension:
    /// `.gz`, `.bgz` or `.gzip` → gzip, anything else → uncompressed.
    Local(PathBuf),

    /// Write to standard output (always uncompressed)
    Stdout,
}

impl DataSink {
    /// Create a sink from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::Local(path.as_ref().to_path_buf())
    }

    /// Create a sink for standard output
    pub fn stdout() -> Self {
        Self::Stdout
    }

    pub(crate) fn extension(&self) -> Option<&str> {
        match self {
            Self::Local(path) => path.extension().and_then(|s| s.to_str()),
            Self::Stdout => None,
        }
    }

    /// Check if this sink represents a compressed output
    pub fn is_compressed(&self) -> bool {
        matches!(self.extension(), Some("gz") | Some("bgz") | Some("gzip"))
    }
}
