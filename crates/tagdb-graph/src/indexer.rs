//! The relation-graph walk.
//!
//! For an item `I` reached with inherited identifiers `T`:
//!
//! 1. every pointer identifier `id` of `I` stores `I`;
//! 2. each `id` is tagged with every `t ∈ T` and every `t` with `id`;
//! 3. `I`'s relations are walked with `I`'s identifiers prepended to `T`.
//!
//! Every item therefore ends up linked in both directions with the pointer
//! identifiers of all of its ancestors, transitively.

use std::sync::Arc;

use tracing::warn;

use tagdb_store::TagWriter;
use tagdb_types::{encode, Item, ItemRef, Value};

use crate::config::IndexerConfig;
use crate::error::{GraphError, GraphResult};

/// The identifiers an item is stored under, one per index pair, in the
/// order the item declares them. Relations are not consulted.
pub fn pointer_ids(item: &dyn Item) -> Vec<String> {
    let kind = item.kind();
    item.indexes()
        .iter()
        .map(|(key, val)| encode(kind, key, val))
        .collect()
}

/// Counters for one indexing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Items visited, relations included.
    pub items: usize,
    /// Entries written (one per pointer identifier).
    pub entries: usize,
    /// Tag edges written, counting each direction. Writes of edges that
    /// already existed are counted too.
    pub edges: usize,
}

impl IndexStats {
    pub fn merge(&mut self, other: IndexStats) {
        self.items += other.items;
        self.entries += other.entries;
        self.edges += other.edges;
    }
}

/// Writes item graphs into a tag store.
#[derive(Clone, Debug, Default)]
pub struct GraphIndexer {
    config: IndexerConfig,
}

impl GraphIndexer {
    pub fn new(config: IndexerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Index `item` and everything reachable from it, starting with an
    /// empty inherited set. An absent item has no effect.
    ///
    /// Writes made before an error are kept.
    pub fn index(
        &self,
        writer: &mut dyn TagWriter,
        item: Option<&ItemRef>,
    ) -> GraphResult<IndexStats> {
        let mut stats = IndexStats::default();
        if let Some(item) = item {
            self.walk(writer, item, &[], &mut Vec::new(), &mut stats)?;
        }
        Ok(stats)
    }

    /// Index every item in `items` as a root.
    pub fn index_all(
        &self,
        writer: &mut dyn TagWriter,
        items: &[ItemRef],
    ) -> GraphResult<IndexStats> {
        let mut stats = IndexStats::default();
        for item in items {
            stats.merge(self.index(writer, Some(item))?);
        }
        Ok(stats)
    }

    fn walk(
        &self,
        writer: &mut dyn TagWriter,
        item: &ItemRef,
        inherited: &[String],
        ancestors: &mut Vec<ItemRef>,
        stats: &mut IndexStats,
    ) -> GraphResult<()> {
        let depth = ancestors.len();
        let own = pointer_ids(&**item);
        if own.is_empty() {
            warn!(kind = item.kind(), "item declares no indexes; walking its relations only");
        }

        if let Some(max_depth) = self.config.max_depth {
            if depth > max_depth {
                return Err(GraphError::DepthExceeded {
                    id: own.first().cloned().unwrap_or_else(|| item.kind().to_string()),
                    max_depth,
                });
            }
        }

        if self.config.detect_cycles {
            if let Some(id) = own.iter().find(|id| inherited.contains(id)) {
                return Err(GraphError::CycleDetected { id: id.clone() });
            }
            let seen = ancestors
                .iter()
                .any(|a| std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(item)));
            if seen {
                return Err(GraphError::CycleDetected {
                    id: own.first().cloned().unwrap_or_else(|| item.kind().to_string()),
                });
            }
        }

        stats.items += 1;
        for id in &own {
            writer.put(id, Value::from_item(Arc::clone(item)));
            stats.entries += 1;

            if !inherited.is_empty() {
                writer.tag(id, inherited);
                for tag in inherited {
                    writer.tag(tag, std::slice::from_ref(id));
                }
                stats.edges += 2 * inherited.len();
            }
        }

        let relations = item.relations();
        if relations.is_empty() {
            return Ok(());
        }

        let mut next = own;
        next.extend_from_slice(inherited);
        ancestors.push(Arc::clone(item));
        for related in &relations {
            self.walk(writer, related, &next, ancestors, stats)?;
        }
        ancestors.pop();

        Ok(())
    }
}
