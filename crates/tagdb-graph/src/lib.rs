//! Relation graph indexer for tagdb.
//!
//! Walks an item and its transitive relations, stores each item under every
//! pointer identifier it declares, and links each of those identifiers in
//! both directions with the identifiers inherited from its ancestors. The
//! result is that "everything related to `foo{id:1}`" and "invalidating
//! `foo{id:1}` cascades to its relatives" both run through the store's one
//! tag index.

pub mod config;
pub mod error;
pub mod indexer;

pub use config::IndexerConfig;
pub use error::{GraphError, GraphResult};
pub use indexer::{pointer_ids, GraphIndexer, IndexStats};
