//! In-memory store sink.

use crate::store::{Item, ItemId, ItemStore, StoreError};
use std::collections::HashMap;

/// Keeps every stored item in memory, in storage order.
///
/// Counts calls to [`ItemStore::store`] so tests can check exactly how
/// often a component touched the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
    store_calls: usize,
    closed: bool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Item stored under `id`.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    /// All stored items, in storage order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Stored items of one class, in storage order.
    pub fn items_of_class<'a>(&'a self, class_name: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .iter()
            .filter(move |item| item.class_name == class_name)
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of `store` calls, including rejected ones.
    pub fn store_calls(&self) -> usize {
        self.store_calls
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ItemStore for MemoryStore {
    fn store(&mut self, item: &Item) -> Result<(), StoreError> {
        self.store_calls += 1;

        if self.closed {
            return Err(StoreError::Rejected("store is closed".to_string()));
        }
        if self.index.contains_key(&item.identifier) {
            return Err(StoreError::DuplicateIdentifier(item.identifier));
        }

        self.index.insert(item.identifier, self.items.len());
        self.items.push(item.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_lookup() {
        let mut store = MemoryStore::new();
        let mut item = Item::new(ItemId::new(0, 1), "Organism");
        item.set_attribute("taxonId", "7227");

        store.store(&item).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(ItemId::new(0, 1)), Some(&item));
        assert_eq!(store.items_of_class("Organism").count(), 1);
        assert_eq!(store.items_of_class("Gene").count(), 0);
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let mut store = MemoryStore::new();
        let item = Item::new(ItemId::new(0, 1), "Gene");

        store.store(&item).unwrap();
        let err = store.store(&item).unwrap_err();

        assert!(matches!(err, StoreError::DuplicateIdentifier(id) if id == ItemId::new(0, 1)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.store_calls(), 2);
    }

    #[test]
    fn test_closed_store_rejects() {
        let mut store = MemoryStore::new();
        store.close().unwrap();
        assert!(store.is_closed());
        assert!(store.store(&Item::new(ItemId::new(0, 1), "Gene")).is_err());
    }
}
