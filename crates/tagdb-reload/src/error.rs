//! Error types for reload and invalidation.

use tagdb_graph::GraphError;
use tagdb_store::StoreError;

/// Error type loaders report failures with.
pub type LoaderError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort a reload or invalidation scope.
///
/// Mutations applied before the error are not rolled back.
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("indexing failed: {0}")]
    Graph(#[from] GraphError),

    #[error("loader for kind {kind:?} failed: {source}")]
    Loader {
        kind: String,
        #[source]
        source: LoaderError,
    },
}

/// Convenience type alias for coordinator operations.
pub type ReloadResult<T> = Result<T, ReloadError>;
