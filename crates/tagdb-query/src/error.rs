//! Error types for typed accessors.

use tagdb_store::StoreError;
use tagdb_types::TypeError;

/// Errors surfaced by getters and relation queries.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An identifier listed under the queried tag is not `kind{key:val}`.
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(#[from] TypeError),

    /// An identifier is listed under the tag but has no value.
    #[error("failed to retrieve value of {id:?}")]
    RetrievalFailed { id: String },

    /// The stored value is not of the accessor's type.
    #[error("expected type {expected} for {id:?}, got {actual}")]
    TypeMismatch {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The prototype passed at construction reports no kind.
    #[error("failed to infer kind of {type_name}")]
    KindInference { type_name: &'static str },
}

/// Convenience alias for accessor results.
pub type QueryResult<T> = Result<T, QueryError>;
