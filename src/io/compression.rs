//! Transparent compression for line sources and output sinks
//!
//! Annotation dumps are routinely shipped as `.gff3.gz` (plain gzip) or
//! bgzip. Both are multi-member gzip streams, so a single
//! [`MultiGzDecoder`] handles reading. Writing picks gzip or plain output
//! from the sink's file extension.

use crate::error::Result;
use crate::io::DataSink;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Gzip magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Where a line source comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Local file path
    Local(PathBuf),
}

impl DataSource {
    /// Create a local file data source
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        DataSource::Local(path.as_ref().to_path_buf())
    }

    /// Open the data source and return a buffered reader
    pub fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        match self {
            DataSource::Local(path) => {
                let file = File::open(path)?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

/// Buffered reader that decompresses gzip/bgzip input when present.
///
/// Compression is detected from the content (magic bytes), not the file name.
///
/// # Example
///
/// ```no_run
/// use gffload::io::{CompressedReader, DataSource};
/// use std::io::BufRead;
///
/// # fn main() -> gffload::Result<()> {
/// let reader = CompressedReader::new(DataSource::from_path("annotation.gff3.gz"))?;
/// for line in reader.lines() {
///     let line = line?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct CompressedReader {
    inner: Box<dyn BufRead + Send>,
}

impl CompressedReader {
    /// Create a new reader from a data source
    pub fn new(source: DataSource) -> Result<Self> {
        let reader = source.open()?;
        Self::from_reader(reader)
    }

    /// Wrap an already-open buffered reader
    pub fn from_reader(mut reader: Box<dyn BufRead + Send>) -> Result<Self> {
        let is_gzipped = {
            let peeked = reader.fill_buf()?;
            peeked.len() >= 2 && peeked[..2] == GZIP_MAGIC
        };

        if is_gzipped {
            Ok(Self {
                inner: Box::new(BufReader::new(MultiGzDecoder::new(reader))),
            })
        } else {
            Ok(Self { inner: reader })
        }
    }
}

impl Read for CompressedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for CompressedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

/// Writer with optional gzip compression
///
/// ```no_run
/// use gffload::io::{CompressedWriter, DataSink};
/// use std::io::Write;
///
/// # fn main() -> std::io::Result<()> {
/// let mut writer = CompressedWriter::new(DataSink::from_path("items.jsonl.gz"))?;
/// writer.write_all(b"{}\n")?;
/// writer.finish()?;
/// # Ok(())
/// # }
/// ```
pub enum CompressedWriter {
    /// Uncompressed writer with buffering
    Plain(Option<BufWriter<Box<dyn Write>>>),

    /// Gzip compressed writer
    Gzip(Option<GzEncoder<BufWriter<Box<dyn Write>>>>),
}

impl CompressedWriter {
    /// Create a new writer from a data sink
    ///
    /// `.gz`, `.bgz` and `.gzip` paths are gzip-compressed; anything else,
    /// including stdout, is written as-is.
    pub fn new(sink: DataSink) -> io::Result<Self> {
        let compressed = sink.is_compressed();
        let writer: Box<dyn Write> = match sink {
            DataSink::Local(path) => Box::new(File::create(path)?),
            DataSink::Stdout => Box::new(io::stdout()),
        };

        if compressed {
            Self::new_gzip(writer)
        } else {
            Self::new_plain(writer)
        }
    }

    /// Create a plain (uncompressed) writer
    pub fn new_plain(writer: Box<dyn Write>) -> io::Result<Self> {
        Ok(Self::Plain(Some(BufWriter::new(writer))))
    }

    /// Create a gzip compressed writer (default level 6)
    pub fn new_gzip(writer: Box<dyn Write>) -> io::Result<Self> {
        let encoder = GzEncoder::new(BufWriter::new(writer), Compression::default());
        Ok(Self::Gzip(Some(encoder)))
    }

    /// Flush buffered data without finalizing a compressed stream
    pub fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(Some(w)) => w.flush(),
            Self::Gzip(Some(w)) => w.flush(),
            _ => Ok(()), // Already finished
        }
    }

    /// Flush everything and, for gzip, write the stream trailer.
    ///
    /// Call this explicitly; `Drop` also finishes but discards errors.
    pub fn finish(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => match w.take() {
                Some(mut writer) => writer.flush(),
                None => Ok(()),
            },
            Self::Gzip(w) => match w.take() {
                Some(encoder) => {
                    let mut inner = encoder.finish()?;
                    inner.flush()
                }
                None => Ok(()),
            },
        }
    }
}

impl Write for CompressedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(Some(w)) => w.write(buf),
            Self::Gzip(Some(w)) => w.write(buf),
            _ => Err(io::Error::new(
                io::ErrorKind::Other,
                "Cannot write to finished writer",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        CompressedWriter::flush(self)
    }
}

impl Drop for CompressedWriter {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}
