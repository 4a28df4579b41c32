/// Errors from tag store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// The forward and reverse tag indices disagree.
    #[error("index inconsistent between {id:?} and tag {tag:?}: {reason}")]
    IndexInconsistent {
        id: String,
        tag: String,
        reason: String,
    },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
