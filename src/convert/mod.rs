//! Turning parsed records into stored items.
//!
//! Everything persisted during a run goes through one [`ItemWriter`]. The
//! [`EntityCache`] owns that writer and makes sure shared entities (data
//! sources, data sets, organisms, synonyms, cross-references) are created
//! once per run; [`make_location`] attaches positions to features.
//!
//! # Example
//!
//! ```
//! use gffload::convert::{make_location, EntityCache, ItemWriter, Persist};
//! use gffload::store::MemoryStore;
//!
//! let mut cache = EntityCache::new(ItemWriter::new(MemoryStore::new(), 0));
//! let organism = cache.resolve_organism("7227")?;
//!
//! let mut gene = cache.writer_mut().create_item("Gene");
//! gene.set_attribute("primaryIdentifier", "FBgn0000490");
//! gene.set_reference("organism", organism);
//! let gene_id = gene.identifier;
//!
//! let staged = cache.resolve_synonym(gene_id, "symbol", "dpp", None, Persist::Deferred)?;
//! cache.writer_mut().store(gene, "FBgn0000490")?;
//! if let gffload::convert::Resolution::Staged(synonym) = staged {
//!     cache.commit(synonym)?;
//! }
//!
//! let chromosome = cache.writer_mut().create_item("Chromosome");
//! let chromosome_id = cache.writer_mut().store(chromosome, "2L")?;
//! make_location(cache.writer_mut(), chromosome_id, gene_id, 2_455_781, 2_441_303, "-")?;
//!
//! assert_eq!(cache.writer().total_stored(), 5);
//! # Ok::<(), gffload::LoaderError>(())
//! ```

pub mod cache;
pub mod hook;
pub mod location;
pub mod writer;

pub use cache::{EntityCache, Persist, Resolution};
pub use hook::{DataSetHook, StoreHook};
pub use location::make_location;
pub use writer::ItemWriter;

/// Class name of data source items
pub const DATA_SOURCE: &str = "DataSource";
/// Class name of data set items
pub const DATA_SET: &str = "DataSet";
/// Class name of organism items
pub const ORGANISM: &str = "Organism";
/// Class name of synonym items
pub const SYNONYM: &str = "Synonym";
/// Class name of cross-reference items
pub const CROSS_REFERENCE: &str = "CrossReference";
/// Class name of location items
pub const LOCATION: &str = "Location";
