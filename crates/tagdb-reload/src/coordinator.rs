use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info};

use tagdb_graph::{pointer_ids, GraphIndexer, IndexStats, IndexerConfig};
use tagdb_store::{InMemoryTagStore, StoreWriter, TagWriter};
use tagdb_types::{ItemRef, Pointer};

use crate::error::{LoaderError, ReloadError, ReloadResult};
use crate::loader::{ItemSink, Loader};

/// Outcome of [`Coordinator::reload_all`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Kinds reloaded, in registration order.
    pub kinds: Vec<String>,
    pub stats: IndexStats,
}

/// Outcome of [`Coordinator::invalidate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvalidationReport {
    /// Identifiers whose entries were removed, in discovery order.
    pub deleted: Vec<String>,
    /// Kinds whose loaders were rerun, in the order first touched.
    pub reloaded: Vec<String>,
    pub stats: IndexStats,
}

/// Builder for a [`Coordinator`].
#[derive(Default)]
pub struct CoordinatorBuilder {
    loaders: IndexMap<String, Arc<dyn Loader>>,
    indexer: IndexerConfig,
}

impl CoordinatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the loader that owns `kind`. A later registration for the
    /// same kind replaces the earlier one.
    pub fn with_loader(mut self, kind: impl Into<String>, loader: impl Loader + 'static) -> Self {
        self.loaders.insert(kind.into(), Arc::new(loader));
        self
    }

    /// Register a closure as the loader that owns `kind`.
    pub fn with_loader_fn<F>(self, kind: impl Into<String>, load: F) -> Self
    where
        F: Fn(&mut ItemSink) -> Result<(), LoaderError> + Send + Sync + 'static,
    {
        self.with_loader(kind, load)
    }

    pub fn with_indexer_config(mut self, config: IndexerConfig) -> Self {
        self.indexer = config;
        self
    }

    pub fn build(self, store: Arc<InMemoryTagStore>) -> Coordinator {
        Coordinator {
            store,
            loaders: self.loaders,
            indexer: GraphIndexer::new(self.indexer),
        }
    }
}

/// Keeps a store populated from its loaders.
///
/// Every operation runs inside a single store write scope, so readers see
/// either the state before or the state after a reload or invalidation.
pub struct Coordinator {
    store: Arc<InMemoryTagStore>,
    loaders: IndexMap<String, Arc<dyn Loader>>,
    indexer: GraphIndexer,
}

impl Coordinator {
    pub fn builder() -> CoordinatorBuilder {
        CoordinatorBuilder::new()
    }

    pub fn store(&self) -> &Arc<InMemoryTagStore> {
        &self.store
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(String::as_str)
    }

    pub fn has_loader(&self, kind: &str) -> bool {
        self.loaders.contains_key(kind)
    }

    /// Run every registered loader and index everything it produces.
    pub fn reload_all(&self) -> ReloadResult<ReloadReport> {
        let report = self.store.update(|writer| {
            let mut report = ReloadReport::default();
            for (kind, loader) in &self.loaders {
                let stats = self.reload_kind(writer, kind, &**loader)?;
                report.stats.merge(stats);
                report.kinds.push(kind.clone());
            }
            Ok::<_, ReloadError>(report)
        })?;

        info!(
            kinds = report.kinds.len(),
            entries = report.stats.entries,
            "reloaded all kinds"
        );
        Ok(report)
    }

    /// Delete `items` and everything linked to them, then rerun the loader
    /// of every kind the cascade removed entries from.
    ///
    /// Only each item's own pointer identifiers seed the cascade; its
    /// relations are not consulted. Kinds without a loader stay deleted.
    pub fn invalidate(&self, items: &[ItemRef]) -> ReloadResult<InvalidationReport> {
        let seeds: Vec<String> = items.iter().flat_map(|item| pointer_ids(&**item)).collect();

        let report = self.store.update(|writer| {
            let mut report = InvalidationReport {
                deleted: writer.invalidate(&seeds),
                ..Default::default()
            };

            for id in &report.deleted {
                let kind = match Pointer::parse(id) {
                    Ok(pointer) => pointer.kind,
                    Err(e) => {
                        debug!(%id, error = %e, "deleted identifier is not a pointer; skipping reload");
                        continue;
                    }
                };
                if report.reloaded.contains(&kind) {
                    continue;
                }
                let Some(loader) = self.loaders.get(&kind) else {
                    continue;
                };
                let stats = self.reload_kind(writer, &kind, &**loader)?;
                report.stats.merge(stats);
                report.reloaded.push(kind);
            }

            Ok::<_, ReloadError>(report)
        })?;

        info!(
            seeds = seeds.len(),
            deleted = report.deleted.len(),
            reloaded = ?report.reloaded,
            "invalidated items"
        );
        Ok(report)
    }

    fn reload_kind(
        &self,
        writer: &mut StoreWriter<'_>,
        kind: &str,
        loader: &dyn Loader,
    ) -> ReloadResult<IndexStats> {
        let mut sink = ItemSink::new();
        loader.load(&mut sink).map_err(|source| ReloadError::Loader {
            kind: kind.to_string(),
            source,
        })?;

        let items = sink.into_items();
        let stats = self.indexer.index_all(writer, &items)?;
        debug!(%kind, roots = items.len(), entries = stats.entries, "reloaded kind");
        Ok(stats)
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("kinds", &self.loaders.keys().collect::<Vec<_>>())
            .field("indexer", self.indexer.config())
            .finish()
    }
}
