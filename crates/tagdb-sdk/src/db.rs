use std::sync::Arc;

use tracing::info;

use tagdb_query::{query_by_tag, Getter, RelationQuery};
use tagdb_reload::{
    Coordinator, CoordinatorBuilder, InvalidationReport, ItemSink, Loader, LoaderError,
    ReloadReport,
};
use tagdb_store::{InMemoryTagStore, TagReader};
use tagdb_types::{Item, ItemRef, Pointer, Value};

use crate::config::TagDbConfig;
use crate::error::SdkResult;

/// Builder for a [`TagDb`].
#[derive(Default)]
pub struct TagDbBuilder {
    config: TagDbConfig,
    loaders: CoordinatorBuilder,
}

impl TagDbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: TagDbConfig) -> Self {
        self.config = config;
        self
    }

    /// Register the loader that owns `kind`.
    pub fn with_loader(mut self, kind: impl Into<String>, loader: impl Loader + 'static) -> Self {
        self.loaders = self.loaders.with_loader(kind, loader);
        self
    }

    pub fn with_loader_fn<F>(mut self, kind: impl Into<String>, load: F) -> Self
    where
        F: Fn(&mut ItemSink) -> Result<(), LoaderError> + Send + Sync + 'static,
    {
        self.loaders = self.loaders.with_loader_fn(kind, load);
        self
    }

    /// Create an empty store and bind the registered loaders to it. Nothing
    /// is loaded until [`TagDb::reload_all`].
    pub fn build(self) -> TagDb {
        let store = Arc::new(InMemoryTagStore::with_config(&self.config.store));
        let coordinator = self
            .loaders
            .with_indexer_config(self.config.indexer.clone())
            .build(store);
        info!(kinds = coordinator.kinds().count(), "tagdb initialized");
        TagDb {
            config: self.config,
            coordinator,
        }
    }
}

/// High-level tagdb handle.
pub struct TagDb {
    config: TagDbConfig,
    coordinator: Coordinator,
}

impl TagDb {
    pub fn builder() -> TagDbBuilder {
        TagDbBuilder::new()
    }

    pub fn config(&self) -> &TagDbConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<InMemoryTagStore> {
        self.coordinator.store()
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    // ---- Population ----

    pub fn reload_all(&self) -> SdkResult<ReloadReport> {
        Ok(self.coordinator.reload_all()?)
    }

    pub fn invalidate(&self, items: &[ItemRef]) -> SdkResult<InvalidationReport> {
        Ok(self.coordinator.invalidate(items)?)
    }

    // ---- Typed access ----

    /// A getter for `T` keyed by one of its index keys.
    pub fn getter<T: Item>(&self, prototype: &T, by_key: &str) -> SdkResult<Getter<T>> {
        Ok(Getter::new(self.reader(), prototype, by_key)?)
    }

    /// A query for every `T` related to `other_kind{other_key:*}`.
    pub fn relation_query<T: Item>(
        &self,
        prototype: &T,
        unique_key: &str,
        other_kind: &str,
        other_key: &str,
    ) -> SdkResult<RelationQuery<T>> {
        Ok(RelationQuery::new(
            self.reader(),
            prototype,
            unique_key,
            other_kind,
            other_key,
        )?)
    }

    /// Untyped scan; see [`query_by_tag`].
    pub fn query_by_tag(
        &self,
        kind: &str,
        tag: &Pointer,
        collect: &mut dyn FnMut(Value) -> bool,
    ) -> SdkResult<()> {
        Ok(query_by_tag(&**self.store(), kind, tag, collect)?)
    }

    fn reader(&self) -> Arc<dyn TagReader> {
        Arc::clone(self.store()) as Arc<dyn TagReader>
    }
}

impl std::fmt::Debug for TagDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagDb")
            .field("config", &self.config)
            .field("coordinator", &self.coordinator)
            .finish()
    }
}
