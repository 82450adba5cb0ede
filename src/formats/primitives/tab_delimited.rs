//! Generic tab-delimited record streaming.
//!
//! Line-oriented annotation formats share the same outer structure:
//! - Tab-delimited fields
//! - Comment lines (starting with `#`)
//! - Blank lines that carry nothing
//!
//! # Design
//!
//! The [`TabDelimitedRecord`] trait defines how one line becomes a record.
//! [`RecordStream`] wraps a line source and keeps exactly one candidate line
//! buffered ahead of the caller, so [`RecordStream::has_next`] is answered
//! without parsing anything. The first candidate line is validated eagerly
//! when the stream is opened; a bad file fails before any record is consumed.
//!
//! # Examples
//!
//! ```
//! use gffload::formats::primitives::{FormatError, RecordStream, TabDelimitedRecord};
//! use gffload::formats::primitives::fields::{parse_required, split_fields};
//!
//! #[derive(Debug, PartialEq)]
//! struct SimpleRecord {
//!     chrom: String,
//!     start: u64,
//! }
//!
//! impl TabDelimitedRecord for SimpleRecord {
//!     fn from_line(line: &str) -> Result<Self, FormatError> {
//!         let fields = split_fields(line, Some(2))?;
//!         Ok(SimpleRecord {
//!             chrom: fields[0].to_string(),
//!             start: parse_required(fields[1], "start")?,
//!         })
//!     }
//!
//!     fn to_line(&self) -> String {
//!         format!("{}\t{}", self.chrom, self.start)
//!     }
//! }
//!
//! # fn main() -> gffload::Result<()> {
//! let data = "# header\nchr1\t100\n\nchr2\t300\n";
//! let mut stream = RecordStream::<_, SimpleRecord>::open(data.as_bytes())?;
//!
//! let mut chroms = Vec::new();
//! while stream.has_next() {
//!     chroms.push(stream.next_record()?.chrom);
//! }
//! assert_eq!(chroms, vec!["chr1", "chr2"]);
//! # Ok(())
//! # }
//! ```

use crate::error::{LoaderError, Result};
use crate::formats::primitives::FormatError;
use crate::io::compression::{CompressedReader, DataSource};
use log::{debug, info};
use std::io::BufRead;
use std::marker::PhantomData;
use std::path::Path;

/// Trait for types that can be parsed from tab-delimited lines.
pub trait TabDelimitedRecord: Sized {
    /// Parse a record from a trimmed, non-comment line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is malformed or contains invalid data.
    /// Implementations must not return partially-filled records.
    fn from_line(line: &str) -> std::result::Result<Self, FormatError>;

    /// Serialize this record to a tab-delimited line (no trailing newline).
    fn to_line(&self) -> String;

    /// Expected number of tab-delimited fields, `None` if variable.
    fn expected_fields() -> Option<usize> {
        None
    }
}

/// Lifecycle of a [`RecordStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// A candidate line is buffered.
    Open,
    /// End of input reached normally.
    Exhausted,
    /// A read or parse failure terminated the stream.
    Failed,
}

/// Forward-only, single-pass stream of records with one-line lookahead.
///
/// Skips lines that are empty after trimming or that begin with `#`.
/// Every failure is terminal: once [`RecordStream::state`] is
/// [`StreamState::Failed`] no further reads happen.
pub struct RecordStream<R: BufRead, T: TabDelimitedRecord> {
    reader: R,
    line_buf: String,
    lookahead: String,
    lookahead_line: usize,
    line_number: usize,
    state: StreamState,
    _phantom: PhantomData<T>,
}

impl<R: BufRead, T: TabDelimitedRecord> RecordStream<R, T> {
    /// Opens a stream over `reader`.
    ///
    /// Reads up to the first candidate line and parses it once to fail fast;
    /// the parsed value is discarded and produced again by
    /// [`RecordStream::next_record`].
    ///
    /// # Errors
    ///
    /// - [`LoaderError::MalformedRecord`] if the first record is invalid
    /// - [`LoaderError::SourceRead`] if the reader fails
    pub fn open(reader: R) -> Result<Self> {
        let mut stream = RecordStream {
            reader,
            line_buf: String::with_capacity(1024),
            lookahead: String::with_capacity(1024),
            lookahead_line: 0,
            line_number: 0,
            state: StreamState::Open,
            _phantom: PhantomData,
        };

        stream.advance()?;

        if stream.state == StreamState::Open {
            if let Err(source) = T::from_line(&stream.lookahead) {
                stream.state = StreamState::Failed;
                return Err(LoaderError::MalformedRecord {
                    line: stream.lookahead_line,
                    source,
                });
            }
            info!(
                "Opened record stream, first record at line {}",
                stream.lookahead_line
            );
        } else {
            info!("Opened record stream with no records");
        }

        Ok(stream)
    }

    /// Whether another record is available.
    ///
    /// Never reads from the source.
    pub fn has_next(&self) -> bool {
        self.state == StreamState::Open
    }

    /// Returns the next record and advances past blank and comment lines.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::ExhaustedStream`] if [`RecordStream::has_next`] is false
    /// - [`LoaderError::MalformedRecord`] if the buffered line is invalid, or
    ///   if the following line is not valid UTF-8
    /// - [`LoaderError::SourceRead`] if reading the following line fails
    ///
    /// When reading the following line fails the record already parsed by
    /// this call is dropped.
    pub fn next_record(&mut self) -> Result<T> {
        if self.state != StreamState::Open {
            return Err(LoaderError::ExhaustedStream);
        }

        let record = match T::from_line(&self.lookahead) {
            Ok(record) => record,
            Err(source) => {
                self.state = StreamState::Failed;
                return Err(LoaderError::MalformedRecord {
                    line: self.lookahead_line,
                    source,
                });
            }
        };

        self.advance()?;
        Ok(record)
    }

    /// Number of physical lines read from the source so far.
    ///
    /// Because of the lookahead this is at least the line of the record
    /// that the next [`RecordStream::next_record`] call will return.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Reads until the next candidate line or end of input.
    fn advance(&mut self) -> Result<()> {
        loop {
            self.line_buf.clear();

            match self.reader.read_line(&mut self.line_buf) {
                Ok(0) => {
                    debug!("Record stream exhausted after {} lines", self.line_number);
                    self.state = StreamState::Exhausted;
                    return Ok(());
                }
                Ok(_) => {
                    self.line_number += 1;

                    let line = self.line_buf.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }

                    self.lookahead.clear();
                    self.lookahead.push_str(line);
                    self.lookahead_line = self.line_number;
                    return Ok(());
                }
                Err(source) if source.kind() == std::io::ErrorKind::InvalidData => {
                    self.state = StreamState::Failed;
                    self.line_number += 1;
                    return Err(LoaderError::MalformedRecord {
                        line: self.line_number,
                        source: FormatError::InvalidEncoding,
                    });
                }
                Err(source) => {
                    self.state = StreamState::Failed;
                    return Err(LoaderError::SourceRead {
                        line: self.line_number,
                        source,
                    });
                }
            }
        }
    }
}

impl<T: TabDelimitedRecord> RecordStream<CompressedReader, T> {
    /// Opens a stream over a local file, decompressing gzip/bgzip input.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its first record is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let reader = CompressedReader::new(DataSource::from_path(path))?;
        Self::open(reader)
    }
}

impl<R: BufRead, T: TabDelimitedRecord> Iterator for RecordStream<R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        Some(self.next_record())
    }
}

impl<R: BufRead, T: TabDelimitedRecord> std::iter::FusedIterator for RecordStream<R, T> {}
