//! Typed read-side accessors for tagdb.
//!
//! The store hands out type-erased [`Value`](tagdb_types::Value)s; the
//! accessors here bind a concrete item type and an index key, build the
//! identifiers to look up, and downcast the results with a checked cast.
//!
//! - [`Getter`] -- one item by one of its own index pairs
//! - [`RelationQuery`] -- every item of one type related to an item of
//!   another kind
//! - [`query_by_tag`] -- untyped scan of the items of one kind under a tag

pub mod error;
pub mod getter;
pub mod relation;

pub use error::{QueryError, QueryResult};
pub use getter::Getter;
pub use relation::{query_by_tag, RelationQuery};
