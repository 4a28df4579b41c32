//! Tag-indexed in-memory store for tagdb.
//!
//! The store maps identifiers to [`Value`]s and keeps a bidirectional
//! adjacency index between identifiers: a forward set (what an identifier
//! was tagged with) and an insertion-ordered reverse set (what declared an
//! identifier as its tag). Keys and tags share one namespace.
//!
//! # Design Rules
//!
//! 1. All mutation happens inside [`InMemoryTagStore::update`], which holds
//!    the exclusive write lock for the whole batch.
//! 2. Readers share the read lock and never observe a half-applied cascade.
//! 3. `B ∈ reverse[A] ⇔ A ∈ forward[B]` holds whenever no batch is in flight.
//! 4. Entries and edges are removed only by invalidation, never by overwrite.
//! 5. A failed batch is not rolled back.
//!
//! [`Value`]: tagdb_types::Value

pub mod config;
pub mod error;
pub mod memory;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryTagStore, StoreWriter, ValueHandle};
pub use traits::{TagReader, TagWriter};
