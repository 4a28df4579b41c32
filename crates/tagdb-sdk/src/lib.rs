//! High-level API for tagdb.
//!
//! [`TagDb`] owns one [`InMemoryTagStore`] and the [`Coordinator`] that keeps
//! it populated, and hands out typed accessors bound to that store. This is
//! the main entry point for applications embedding tagdb.
//!
//! [`Coordinator`]: tagdb_reload::Coordinator

pub mod config;
pub mod db;
pub mod error;

pub use config::TagDbConfig;
pub use db::{TagDb, TagDbBuilder};
pub use error::{SdkError, SdkResult};

// Re-export key types
pub use tagdb_graph::{IndexStats, IndexerConfig};
pub use tagdb_query::{Getter, RelationQuery};
pub use tagdb_reload::{InvalidationReport, ItemSink, Loader, LoaderError, ReloadReport};
pub use tagdb_store::{InMemoryTagStore, StoreConfig, TagReader};
pub use tagdb_types::{encode, Item, ItemRef, Pointer, Value};
