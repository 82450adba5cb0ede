//! I/O module: line sources and output sinks
//!
//! Readers hand a buffered, transparently decompressed byte stream to the
//! record streams in [`crate::formats`]; writers back the GFF3 writer and
//! the JSON-lines item store.

pub mod compression;
pub mod sink;

pub use compression::{CompressedReader, CompressedWriter, DataSource};
pub use sink::DataSink;
