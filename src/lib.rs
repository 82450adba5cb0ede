//! gffload: streaming GFF3 ingestion into an item store
//!
//! # Overview
//!
//! gffload reads GFF3 annotation files one record at a time and provides the
//! pieces a loader needs to turn them into stored items without duplicating
//! shared entities: a streaming parser with one-line lookahead, a run-scoped
//! entity cache for provenance and cross-references, and a location builder.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gffload::convert::{make_location, EntityCache};
//! use gffload::store::JsonLinesStore;
//! use gffload::{Gff3Stream, LoaderConfig};
//!
//! # fn main() -> gffload::Result<()> {
//! let config = LoaderConfig::from_path("loader.toml")?;
//! let store = JsonLinesStore::create("items.jsonl.gz")?;
//! let mut cache = EntityCache::from_config(store, &config)?;
//!
//! let mut chromosomes = std::collections::HashMap::new();
//! for record in Gff3Stream::from_path("genes.gff3.gz")? {
//!     let record = record?;
//!     if !chromosomes.contains_key(&record.seqid) {
//!         let mut chromosome = cache.writer_mut().create_item("Chromosome");
//!         chromosome.set_attribute("primaryIdentifier", record.seqid.as_str());
//!         let id = cache.writer_mut().store(chromosome, &record.seqid)?;
//!         chromosomes.insert(record.seqid.clone(), id);
//!     }
//!
//!     let mut feature = cache.writer_mut().create_item(&record.feature_type);
//!     if let Some(id) = record.id() {
//!         feature.set_attribute("primaryIdentifier", id);
//!     }
//!     let feature_id = feature.identifier;
//!     cache.writer_mut().store(feature, record.id().unwrap_or(""))?;
//!
//!     make_location(
//!         cache.writer_mut(),
//!         chromosomes[&record.seqid],
//!         feature_id,
//!         record.start,
//!         record.end,
//!         record.strand.symbol(),
//!     )?;
//! }
//!
//! cache.writer_mut().close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`formats`]: GFF3 records, the lookahead record stream and the writer
//! - [`io`]: Compressed local input and output
//! - [`store`]: Items, identifiers and store sinks
//! - [`convert`]: Entity cache, item writer and location builder
//! - [`config`]: Run configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod convert;
pub mod error;
pub mod formats;
pub mod io;
pub mod store;

// Re-export commonly used types
pub use config::LoaderConfig;
pub use convert::{make_location, EntityCache, ItemWriter, Persist, Resolution};
pub use error::{LoaderError, Result};
pub use formats::{Gff3Record, Gff3Stream, Gff3Writer, RecordStream, Strand};
pub use store::{Item, ItemId, ItemStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
