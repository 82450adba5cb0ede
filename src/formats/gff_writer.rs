//! GFF3 writer with compression support
//!
//! Writes the `##gff-version 3` directive followed by one line per record,
//! using [`Gff3Record`]'s serialization (reserved characters in column 9
//! are percent-encoded). Output compression follows the sink's extension.
//!
//! # Example
//!
//! ```no_run
//! use gffload::formats::gff::{Attributes, Gff3Record};
//! use gffload::formats::gff_writer::Gff3Writer;
//! use gffload::formats::primitives::Strand;
//!
//! # fn main() -> gffload::Result<()> {
//! let mut writer = Gff3Writer::create("annotations.gff3.gz")?;
//!
//! let record = Gff3Record {
//!     seqid: "chr1".to_string(),
//!     source: "FlyBase".to_string(),
//!     feature_type: "gene".to_string(),
//!     start: 11869,
//!     end: 14409,
//!     score: None,
//!     strand: Strand::Forward,
//!     phase: None,
//!     attributes: [("ID", "gene1"), ("Name", "DDX11L1")].into_iter().collect(),
//! };
//!
//! writer.write_record(&record)?;
//! writer.finish()?;
//! # Ok(())
//! # }
//! ```

use crate::error::{LoaderError, Result};
use crate::formats::gff::Gff3Record;
use crate::formats::primitives::{FormatError, TabDelimitedRecord};
use crate::io::compression::CompressedWriter;
use crate::io::sink::DataSink;
use std::io::Write;
use std::path::Path;

/// Directive that opens every GFF3 file.
pub const GFF3_VERSION_DIRECTIVE: &str = "##gff-version 3";

/// GFF3 writer
pub struct Gff3Writer {
    writer: CompressedWriter,
    records_written: usize,
}

impl Gff3Writer {
    /// Create a new GFF3 writer from a data sink and write the version directive
    pub fn new(sink: DataSink) -> Result<Self> {
        let mut writer = CompressedWriter::new(sink)?;
        writeln!(writer, "{}", GFF3_VERSION_DIRECTIVE)?;
        Ok(Self {
            writer,
            records_written: 0,
        })
    }

    /// Create a GFF3 writer from a file path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(DataSink::from_path(path))
    }

    /// Create a GFF3 writer to stdout
    pub fn stdout() -> Result<Self> {
        Self::new(DataSink::stdout())
    }

    /// Write a single record
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::MalformedRecord`] (with the 1-based ordinal of
    /// the record in this output) if:
    /// - seqid or type is empty
    /// - start > end
    /// - phase is not 0, 1 or 2
    ///
    /// and [`LoaderError::Io`] if writing fails.
    pub fn write_record(&mut self, record: &Gff3Record) -> Result<()> {
        self.validate(record)
            .map_err(|source| LoaderError::MalformedRecord {
                line: self.records_written + 1,
                source,
            })?;

        writeln!(self.writer, "{}", record.to_line())?;

        self.records_written += 1;
        Ok(())
    }

    fn validate(&self, record: &Gff3Record) -> std::result::Result<(), FormatError> {
        if record.seqid.is_empty() {
            return Err(FormatError::InvalidField {
                field: "seqid".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if record.feature_type.is_empty() {
            return Err(FormatError::InvalidField {
                field: "type".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if record.start > record.end {
            return Err(FormatError::InvalidInterval {
                start: record.start,
                end: record.end,
            });
        }

        if let Some(phase) = record.phase {
            if phase > 2 {
                return Err(FormatError::InvalidField {
                    field: "phase".to_string(),
                    reason: format!("{} (must be 0, 1, or 2)", phase),
                });
            }
        }

        Ok(())
    }

    /// Write every record from an iterator, stopping at the first error
    ///
    /// Accepts a [`crate::formats::gff::Gff3Stream`] directly:
    ///
    /// ```no_run
    /// use gffload::formats::gff::Gff3Stream;
    /// use gffload::formats::gff_writer::Gff3Writer;
    ///
    /// # fn main() -> gffload::Result<()> {
    /// let stream = Gff3Stream::from_path("input.gff3")?;
    /// let mut writer = Gff3Writer::create("output.gff3.gz")?;
    /// writer.write_all(stream)?;
    /// writer.finish()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn write_all<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<Gff3Record>>,
    {
        for record in records {
            self.write_record(&record?)?;
        }
        Ok(())
    }

    /// Get the number of records written so far
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush buffered data
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Finish writing, flushing and closing any compression stream
    pub fn finish(mut self) -> Result<()> {
        self.writer.finish()?;
        Ok(())
    }
}
