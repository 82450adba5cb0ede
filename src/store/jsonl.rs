//! JSON-lines store sink: one serialized [`Item`] per line.

use crate::io::{CompressedWriter, DataSink};
use crate::store::{Item, ItemId, ItemStore, StoreError};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Writes items as JSON lines to a [`DataSink`].
///
/// `.gz` paths are gzip-compressed. [`ItemStore::close`] must be called to
/// finalize the output.
///
/// ```no_run
/// use gffload::store::{Item, ItemId, ItemStore, JsonLinesStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = JsonLinesStore::create("items.jsonl.gz")?;
/// store.store(&Item::new(ItemId::new(0, 1), "DataSource"))?;
/// store.close()?;
/// # Ok(())
/// # }
/// ```
pub struct JsonLinesStore {
    writer: CompressedWriter,
    seen: HashSet<ItemId>,
}

impl JsonLinesStore {
    /// Creates a store writing to `sink`.
    pub fn new(sink: DataSink) -> Result<Self, StoreError> {
        Ok(JsonLinesStore {
            writer: CompressedWriter::new(sink)?,
            seen: HashSet::new(),
        })
    }

    /// Creates a store writing to a file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::new(DataSink::from_path(path))
    }

    /// Number of items written.
    pub fn items_written(&self) -> usize {
        self.seen.len()
    }
}

impl ItemStore for JsonLinesStore {
    fn store(&mut self, item: &Item) -> Result<(), StoreError> {
        if self.seen.contains(&item.identifier) {
            return Err(StoreError::DuplicateIdentifier(item.identifier));
        }

        serde_json::to_writer(&mut self.writer, item)?;
        self.writer.write_all(b"\n")?;
        self.seen.insert(item.identifier);
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.writer.finish()?;
        Ok(())
    }
}
