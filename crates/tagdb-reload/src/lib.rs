//! Loader registry and invalidation coordinator for tagdb.
//!
//! Each kind of item is owned by one [`Loader`]. The [`Coordinator`]
//! rebuilds every kind on [`reload_all`](Coordinator::reload_all) and, on
//! [`invalidate`](Coordinator::invalidate), deletes the given items together
//! with everything the tag index links them to, then reruns the loader of
//! every kind the cascade touched. Reloads are whole-category; there is no
//! incremental repair.

pub mod coordinator;
pub mod error;
pub mod loader;

pub use coordinator::{Coordinator, CoordinatorBuilder, InvalidationReport, ReloadReport};
pub use error::{LoaderError, ReloadError, ReloadResult};
pub use loader::{ItemSink, Loader};
