//! Annotation file formats.
//!
//! - [`primitives`]: shared infrastructure for tab-delimited formats
//!   (record trait, lookahead stream, field helpers, strands, escaping)
//! - [`gff`]: GFF3 records and streaming reader
//! - [`gff_writer`]: GFF3 writer
//!
//! Parsing is streaming-first: a [`gff::Gff3Stream`] holds one line of
//! lookahead and never buffers the file.
//!
//! ```rust,ignore
//! // Bad: Loads entire file into memory
//! let records: Vec<Gff3Record> = stream.collect::<Result<_>>()?;
//!
//! // Good: One record at a time
//! while stream.has_next() {
//!     let record = stream.next_record()?;
//! }
//! ```

pub mod gff;
pub mod gff_writer;
pub mod primitives;

// Re-export commonly used types
pub use gff::{Attributes, Gff3Record, Gff3Stream};
pub use gff_writer::Gff3Writer;
pub use primitives::{
    FormatError, GenomicInterval, RecordStream, StreamState, Strand, TabDelimitedRecord,
};
