//! Hooks that amend items just before they are stored.

use crate::convert::{DATA_SET, DATA_SOURCE, ORGANISM};
use crate::store::{Item, ItemId};

/// Called by [`crate::convert::ItemWriter`] on every item before it reaches the sink.
pub trait StoreHook {
    /// Amends `item` in place.
    fn process(&self, item: &mut Item);
}

/// Adds a run's default data set to the `dataSets` collection of every
/// stored item, except data sources, data sets and organisms.
#[derive(Debug, Clone, Copy)]
pub struct DataSetHook {
    data_set: ItemId,
}

impl DataSetHook {
    /// Collection the data set is added to.
    pub const COLLECTION: &'static str = "dataSets";

    /// Creates a hook attaching `data_set`.
    pub fn new(data_set: ItemId) -> Self {
        DataSetHook { data_set }
    }

    /// The attached data set.
    pub fn data_set(&self) -> ItemId {
        self.data_set
    }
}

impl StoreHook for DataSetHook {
    fn process(&self, item: &mut Item) {
        if matches!(item.class_name.as_str(), DATA_SOURCE | DATA_SET | ORGANISM) {
            return;
        }
        item.add_to_collection(Self::COLLECTION, self.data_set);
    }
}
