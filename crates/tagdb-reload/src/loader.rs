//! The [`Loader`] trait and the sink loaders push items into.

use std::sync::Arc;

use tagdb_types::{Item, ItemRef};

use crate::error::LoaderError;

/// Collects the root items produced by one loader run.
#[derive(Default)]
pub struct ItemSink {
    items: Vec<ItemRef>,
}

impl ItemSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one root item.
    pub fn add(&mut self, item: ItemRef) {
        self.items.push(item);
    }

    /// Add a concrete item without erasing it at the call site.
    pub fn push<T: Item>(&mut self, item: Arc<T>) {
        self.items.push(item);
    }

    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = ItemRef>,
    {
        self.items.extend(items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<ItemRef> {
        self.items
    }
}

/// Produces every root item of one kind.
///
/// Called once per reload of its kind, possibly many times over the life of
/// a store, so it must be idempotent and have no side effects beyond
/// pushing items.
pub trait Loader: Send + Sync {
    fn load(&self, sink: &mut ItemSink) -> Result<(), LoaderError>;
}

impl<F> Loader for F
where
    F: Fn(&mut ItemSink) -> Result<(), LoaderError> + Send + Sync,
{
    fn load(&self, sink: &mut ItemSink) -> Result<(), LoaderError> {
        self(sink)
    }
}
