//! Entity descriptions and the store sinks that persist them.
//!
//! An [`Item`] is a class name plus attributes, single-valued references
//! and multi-valued collections, all pointing at other items through their
//! [`ItemId`]. Anything implementing [`ItemStore`] can receive items: the
//! in-memory [`MemoryStore`] for tests and small runs, or
//! [`JsonLinesStore`] for handing a run's output to a downstream loader.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonLinesStore;
pub use memory::MemoryStore;

/// Stable identifier of an item within a run, rendered `"{namespace}_{sequence}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId {
    /// Per-source prefix, lets several runs feed one warehouse without clashes
    pub namespace: u32,
    /// Position in the run's creation order, starting at 1
    pub sequence: u64,
}

impl ItemId {
    /// Creates an identifier.
    pub fn new(namespace: u32, sequence: u64) -> Self {
        ItemId {
            namespace,
            sequence,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.namespace, self.sequence)
    }
}

/// Description of one entity destined for the warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier assigned at creation
    pub identifier: ItemId,
    /// Class name (DataSource, Gene, Location, ...)
    pub class_name: String,
    /// Scalar attributes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Single-valued references to other items
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub references: BTreeMap<String, ItemId>,
    /// Multi-valued references to other items
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub collections: BTreeMap<String, Vec<ItemId>>,
}

impl Item {
    /// Creates an empty item.
    pub fn new(identifier: ItemId, class_name: impl Into<String>) -> Self {
        Item {
            identifier,
            class_name: class_name.into(),
            attributes: BTreeMap::new(),
            references: BTreeMap::new(),
            collections: BTreeMap::new(),
        }
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Sets a reference, replacing any previous target.
    pub fn set_reference(&mut self, name: impl Into<String>, target: ItemId) {
        self.references.insert(name.into(), target);
    }

    /// Adds `target` to a collection unless it is already there.
    pub fn add_to_collection(&mut self, name: impl Into<String>, target: ItemId) {
        let ids = self.collections.entry(name.into()).or_default();
        if !ids.contains(&target) {
            ids.push(target);
        }
    }

    /// Value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Target of a reference.
    pub fn reference(&self, name: &str) -> Option<ItemId> {
        self.references.get(name).copied()
    }

    /// Members of a collection (empty if unset).
    pub fn collection(&self, name: &str) -> &[ItemId] {
        self.collections
            .get(name)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }
}

/// Errors reported by a store sink.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The sink could not write
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The item could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An item with this identifier was already stored
    #[error("Item {0} has already been stored")]
    DuplicateIdentifier(ItemId),

    /// The sink refused the item for another reason
    #[error("Item rejected: {0}")]
    Rejected(String),
}

/// Destination for created entities.
///
/// Implementations must store each identifier at most once. Calls are
/// synchronous; any timeout or retry policy belongs to the implementation.
pub trait ItemStore {
    /// Persists one item.
    fn store(&mut self, item: &Item) -> Result<(), StoreError>;

    /// Flushes and releases resources at the end of a run.
    fn close(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl<S: ItemStore + ?Sized> ItemStore for &mut S {
    fn store(&mut self, item: &Item) -> Result<(), StoreError> {
        (**self).store(item)
    }

    fn close(&mut self) -> Result<(), StoreError> {
        (**self).close()
    }
}

impl<S: ItemStore + ?Sized> ItemStore for Box<S> {
    fn store(&mut self, item: &Item) -> Result<(), StoreError> {
        (**self).store(item)
    }

    fn close(&mut self) -> Result<(), StoreError> {
        (**self).close()
    }
}
