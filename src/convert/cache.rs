//! Run-scoped identity maps for provenance and cross-reference entities.
//!
//! Within one run at most one item is created per logical key:
//!
//! | Class          | Key                         | References             |
//! |----------------|-----------------------------|------------------------|
//! | DataSource     | name                        |                        |
//! | DataSet        | title                       | `dataSource`           |
//! | Organism       | taxon id                    |                        |
//! | Synonym        | (subject, type, value)      | `subject`              |
//! | CrossReference | (subject, value)            | `subject`, `source`    |
//!
//! A cache miss builds the item, stores it and memoizes the key; a hit
//! returns the memoized outcome without touching the store. Keys are only
//! memoized once their store call succeeded, so a failed write can be
//! attempted again. Nothing is ever evicted.

use crate::config::LoaderConfig;
use crate::convert::hook::DataSetHook;
use crate::convert::writer::ItemWriter;
use crate::convert::{CROSS_REFERENCE, DATA_SET, DATA_SOURCE, ORGANISM, SYNONYM};
use crate::error::Result;
use crate::store::{Item, ItemId, ItemStore};
use log::{debug, info, trace};
use std::collections::{HashMap, HashSet};

/// When a synonym or cross-reference is written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
    /// Store immediately. Only use once the subject itself is stored.
    Now,
    /// Build the item and hand it back; the caller stores it later with
    /// [`EntityCache::commit`], after the subject.
    Deferred,
}

/// Outcome of resolving a synonym or cross-reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A new item was created and stored.
    Created(ItemId),
    /// A new item was created but not stored; pass it to [`EntityCache::commit`].
    Staged(Item),
    /// An item with the same key was created earlier in this run.
    AlreadyExists,
    /// The value was empty, nothing was created.
    Blank,
}

impl Resolution {
    /// Identifier of the item created by this call, if any.
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Resolution::Created(id) => Some(*id),
            Resolution::Staged(item) => Some(item.identifier),
            Resolution::AlreadyExists | Resolution::Blank => None,
        }
    }

    /// Whether this call created a new item.
    pub fn is_new(&self) -> bool {
        self.item_id().is_some()
    }
}

type SynonymKey = (ItemId, String, String);
type CrossReferenceKey = (ItemId, String);

/// Deduplicating factory for the entities shared across a conversion run.
///
/// Owns the [`ItemWriter`] every item goes through. One instance per run;
/// not meant to be shared between threads.
pub struct EntityCache<S: ItemStore> {
    writer: ItemWriter<S>,
    data_sources: HashMap<String, ItemId>,
    data_sets: HashMap<String, ItemId>,
    organisms: HashMap<String, ItemId>,
    synonyms: HashSet<SynonymKey>,
    cross_references: HashSet<CrossReferenceKey>,
    default_data_set: Option<ItemId>,
    default_organism: Option<ItemId>,
}

impl<S: ItemStore> EntityCache<S> {
    /// Creates an empty cache around `writer`.
    pub fn new(writer: ItemWriter<S>) -> Self {
        EntityCache {
            writer,
            data_sources: HashMap::new(),
            data_sets: HashMap::new(),
            organisms: HashMap::new(),
            synonyms: HashSet::new(),
            cross_references: HashSet::new(),
            default_data_set: None,
            default_organism: None,
        }
    }

    /// Creates a cache for a configured run.
    ///
    /// The default data source and data set are created up front and a
    /// [`DataSetHook`] attaching that data set is installed; the default
    /// organism, if any, is created as well.
    pub fn from_config(store: S, config: &LoaderConfig) -> Result<Self> {
        config.validate()?;
        let mut cache = EntityCache::new(ItemWriter::new(store, config.identifier_namespace));

        if let Some((source_name, title)) = config.default_data_set() {
            let source = cache.resolve_data_source(source_name)?;
            let data_set = cache.resolve_data_set(title, source)?;
            cache.writer.set_hook(Box::new(DataSetHook::new(data_set)));
            cache.default_data_set = Some(data_set);
            info!("Items will be attached to data set '{}' ({})", title, data_set);
        }

        if let Some(taxon_id) = config.default_taxon_id() {
            cache.default_organism = Some(cache.resolve_organism(taxon_id)?);
        }

        Ok(cache)
    }

    /// Returns the data source called `name`, creating and storing it on first use.
    ///
    /// An empty name resolves to `None` without touching the store.
    pub fn resolve_data_source(&mut self, name: &str) -> Result<Option<ItemId>> {
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(&id) = self.data_sources.get(name) {
            trace!("DataSource '{}' cached as {}", name, id);
            return Ok(Some(id));
        }

        let mut item = self.writer.create_item(DATA_SOURCE);
        item.set_attribute("name", name);
        let id = self.writer.store(item, name)?;

        self.data_sources.insert(name.to_string(), id);
        debug!("Created DataSource '{}' as {}", name, id);
        Ok(Some(id))
    }

    /// Returns the data set titled `title`, creating and storing it on first use.
    ///
    /// `data_source` is only used on creation; later calls with the same
    /// title return the original data set whatever source they pass.
    pub fn resolve_data_set(&mut self, title: &str, data_source: Option<ItemId>) -> Result<ItemId> {
        if let Some(&id) = self.data_sets.get(title) {
            trace!("DataSet '{}' cached as {}", title, id);
            return Ok(id);
        }

        let mut item = self.writer.create_item(DATA_SET);
        item.set_attribute("name", title);
        if let Some(source) = data_source {
            item.set_reference("dataSource", source);
        }
        let id = self.writer.store(item, title)?;

        self.data_sets.insert(title.to_string(), id);
        debug!("Created DataSet '{}' as {}", title, id);
        Ok(id)
    }

    /// Returns the organism with NCBI taxonomy id `taxon_id`, creating and storing it on first use.
    pub fn resolve_organism(&mut self, taxon_id: &str) -> Result<ItemId> {
        if let Some(&id) = self.organisms.get(taxon_id) {
            trace!("Organism {} cached as {}", taxon_id, id);
            return Ok(id);
        }

        let mut item = self.writer.create_item(ORGANISM);
        item.set_attribute("taxonId", taxon_id);
        let id = self.writer.store(item, taxon_id)?;

        self.organisms.insert(taxon_id.to_string(), id);
        debug!("Created Organism {} as {}", taxon_id, id);
        Ok(id)
    }

    /// Creates a synonym of `subject` unless one with the same type and value exists.
    ///
    /// `is_primary` is recorded only when known.
    pub fn resolve_synonym(
        &mut self,
        subject: ItemId,
        synonym_type: &str,
        value: &str,
        is_primary: Option<bool>,
        persist: Persist,
    ) -> Result<Resolution> {
        if value.is_empty() {
            return Ok(Resolution::Blank);
        }

        let key: SynonymKey = (subject, synonym_type.to_string(), value.to_string());
        if self.synonyms.contains(&key) {
            trace!("Synonym {}/{}/{} already created", subject, synonym_type, value);
            return Ok(Resolution::AlreadyExists);
        }

        let mut item = self.writer.create_item(SYNONYM);
        item.set_attribute("type", synonym_type);
        item.set_attribute("value", value);
        item.set_reference("subject", subject);
        if let Some(primary) = is_primary {
            item.set_attribute("isPrimary", primary.to_string());
        }

        let label = format!("{}/{}/{}", subject, synonym_type, value);
        let resolution = self.finish(item, persist, &label)?;
        self.synonyms.insert(key);
        Ok(resolution)
    }

    /// Creates a cross-reference from `subject` to identifier `value` in
    /// the database `data_source`, unless `(subject, value)` already exists.
    ///
    /// The data source is resolved (and stored, if new) even when the
    /// cross-reference itself is deferred. An empty `data_source` leaves the
    /// `source` reference unset.
    pub fn resolve_cross_reference(
        &mut self,
        subject: ItemId,
        value: &str,
        data_source: &str,
        persist: Persist,
    ) -> Result<Resolution> {
        if value.is_empty() {
            return Ok(Resolution::Blank);
        }

        let key: CrossReferenceKey = (subject, value.to_string());
        if self.cross_references.contains(&key) {
            trace!("CrossReference {}/{} already created", subject, value);
            return Ok(Resolution::AlreadyExists);
        }

        let source = self.resolve_data_source(data_source)?;

        let mut item = self.writer.create_item(CROSS_REFERENCE);
        item.set_attribute("identifier", value);
        item.set_reference("subject", subject);
        if let Some(source) = source {
            item.set_reference("source", source);
        }

        let label = format!("{}/{}", subject, value);
        let resolution = self.finish(item, persist, &label)?;
        self.cross_references.insert(key);
        Ok(resolution)
    }

    /// Stores an item previously returned as [`Resolution::Staged`].
    pub fn commit(&mut self, item: Item) -> Result<ItemId> {
        let key = item.identifier.to_string();
        self.writer.store(item, &key)
    }

    fn finish(&mut self, item: Item, persist: Persist, key: &str) -> Result<Resolution> {
        match persist {
            Persist::Now => {
                let class_name = item.class_name.clone();
                let id = self.writer.store(item, key)?;
                debug!("Created {} '{}' as {}", class_name, key, id);
                Ok(Resolution::Created(id))
            }
            Persist::Deferred => {
                debug!("Staged {} '{}' as {}", item.class_name, key, item.identifier);
                Ok(Resolution::Staged(item))
            }
        }
    }

    /// Data set attached to every stored item, when configured.
    pub fn default_data_set(&self) -> Option<ItemId> {
        self.default_data_set
    }

    /// Organism configured for this run.
    pub fn default_organism(&self) -> Option<ItemId> {
        self.default_organism
    }

    /// The writer, for creating and storing feature items.
    pub fn writer(&self) -> &ItemWriter<S> {
        &self.writer
    }

    /// Mutable access to the writer.
    pub fn writer_mut(&mut self) -> &mut ItemWriter<S> {
        &mut self.writer
    }

    /// Discards the identity maps and returns the writer.
    pub fn into_writer(self) -> ItemWriter<S> {
        self.writer
    }
}
