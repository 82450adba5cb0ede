//! Placement of features on reference sequences.

use crate::convert::writer::ItemWriter;
use crate::convert::LOCATION;
use crate::error::Result;
use crate::store::{ItemId, ItemStore};
use log::debug;

/// Creates and stores a `Location` placing `feature` on `located_on`.
///
/// Coordinates are reordered so the stored `start` is never greater than
/// `end`. The strand is stored as given. Every call stores a new item,
/// identical arguments included.
///
/// # Example
///
/// ```
/// use gffload::convert::{make_location, ItemWriter};
/// use gffload::store::MemoryStore;
///
/// let mut writer = ItemWriter::new(MemoryStore::new(), 0);
/// let chromosome = writer.create_item("Chromosome").identifier;
/// let gene = writer.create_item("Gene").identifier;
///
/// let id = make_location(&mut writer, chromosome, gene, 500, 100, "+")?;
/// let location = writer.sink().get(id).unwrap();
/// assert_eq!(location.attribute("start"), Some("100"));
/// assert_eq!(location.attribute("end"), Some("500"));
/// # Ok::<(), gffload::LoaderError>(())
/// ```
pub fn make_location<S: ItemStore>(
    writer: &mut ItemWriter<S>,
    located_on: ItemId,
    feature: ItemId,
    start: u64,
    end: u64,
    strand: &str,
) -> Result<ItemId> {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };

    let mut location = writer.create_item(LOCATION);
    location.set_attribute("start", start.to_string());
    location.set_attribute("end", end.to_string());
    location.set_attribute("strand", strand);
    location.set_reference("locatedOn", located_on);
    location.set_reference("feature", feature);

    let key = format!("{}:{}..{}", located_on, start, end);
    let id = writer.store(location, &key)?;
    debug!("Placed {} on {} at {}..{} ({})", feature, located_on, start, end, strand);
    Ok(id)
}
