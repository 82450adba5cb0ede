//! The single path through which a run persists items.

use crate::convert::hook::StoreHook;
use crate::error::{LoaderError, Result};
use crate::store::{Item, ItemId, ItemStore};
use log::{debug, info};
use std::collections::BTreeMap;

/// Allocates item identifiers and forwards items to a store sink.
///
/// Identifiers are handed out when an item is created, not when it is
/// stored, so an item may reference another that has not been stored yet.
/// Before each store call the installed [`StoreHook`] (if any) may amend
/// the item.
pub struct ItemWriter<S: ItemStore> {
    store: S,
    namespace: u32,
    next_sequence: u64,
    hook: Option<Box<dyn StoreHook>>,
    stored: BTreeMap<String, usize>,
}

impl<S: ItemStore> ItemWriter<S> {
    /// Creates a writer whose identifiers start at `{namespace}_1`.
    pub fn new(store: S, namespace: u32) -> Self {
        ItemWriter {
            store,
            namespace,
            next_sequence: 1,
            hook: None,
            stored: BTreeMap::new(),
        }
    }

    /// Creates an empty item with a fresh identifier.
    pub fn create_item(&mut self, class_name: &str) -> Item {
        let id = ItemId::new(self.namespace, self.next_sequence);
        self.next_sequence += 1;
        Item::new(id, class_name)
    }

    /// Installs the hook applied to every subsequently stored item.
    pub fn set_hook(&mut self, hook: Box<dyn StoreHook>) {
        self.hook = Some(hook);
    }

    /// Persists an item.
    ///
    /// `key` only serves as error context: it names the logical entity
    /// (data source name, taxon id, ...) being stored.
    ///
    /// # Errors
    ///
    /// [`LoaderError::Persistence`] if the sink rejects the item. Nothing is
    /// retried.
    pub fn store(&mut self, mut item: Item, key: &str) -> Result<ItemId> {
        if let Some(hook) = &self.hook {
            hook.process(&mut item);
        }

        self.store
            .store(&item)
            .map_err(|source| LoaderError::Persistence {
                class_name: item.class_name.clone(),
                key: key.to_string(),
                source,
            })?;

        debug!("Stored {} {} ({})", item.class_name, item.identifier, key);
        *self.stored.entry(item.class_name).or_insert(0) += 1;
        Ok(item.identifier)
    }

    /// Number of items of `class_name` stored so far.
    pub fn stored_count(&self, class_name: &str) -> usize {
        self.stored.get(class_name).copied().unwrap_or(0)
    }

    /// Number of items stored so far.
    pub fn total_stored(&self) -> usize {
        self.stored.values().sum()
    }

    /// The underlying sink.
    pub fn sink(&self) -> &S {
        &self.store
    }

    /// Closes the sink and logs what the run stored.
    pub fn close(&mut self) -> Result<()> {
        self.store.close()?;
        info!(
            "Closed item writer after storing {} items: {:?}",
            self.total_stored(),
            self.stored
        );
        Ok(())
    }

    /// Gives back the sink.
    pub fn into_sink(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};

    struct RejectingStore;

    impl ItemStore for RejectingStore {
        fn store(&mut self, _item: &Item) -> std::result::Result<(), StoreError> {
            Err(StoreError::Rejected("read-only".to_string()))
        }

        fn close(&mut self) -> std::result::Result<(), StoreError> {
            Err(StoreError::Rejected("read-only".to_string()))
        }
    }

    #[test]
    fn test_identifiers_are_sequential() {
        let mut writer = ItemWriter::new(MemoryStore::new(), 2);
        let a = writer.create_item("Gene");
        let b = writer.create_item("Gene");

        assert_eq!(a.identifier.to_string(), "2_1");
        assert_eq!(b.identifier.to_string(), "2_2");
    }

    #[test]
    fn test_store_counts_per_class() {
        let mut writer = ItemWriter::new(MemoryStore::new(), 0);
        for class in ["Gene", "Gene", "Exon"] {
            let item = writer.create_item(class);
            writer.store(item, "k").unwrap();
        }

        assert_eq!(writer.stored_count("Gene"), 2);
        assert_eq!(writer.stored_count("Exon"), 1);
        assert_eq!(writer.stored_count("Location"), 0);
        assert_eq!(writer.total_stored(), 3);

        writer.close().unwrap();
        assert!(writer.sink().is_closed());
    }

    #[test]
    fn test_rejection_carries_context() {
        let mut writer = ItemWriter::new(RejectingStore, 0);
        let item = writer.create_item("DataSource");

        match writer.store(item, "FlyBase") {
            Err(LoaderError::Persistence { class_name, key, .. }) => {
                assert_eq!(class_name, "DataSource");
                assert_eq!(key, "FlyBase");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(writer.total_stored(), 0);
        assert!(matches!(writer.close(), Err(LoaderError::Store(_))));
    }
}
