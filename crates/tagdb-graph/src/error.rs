//! Error types for the graph indexer.

/// Errors that can occur while indexing an item graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// An item is reachable from itself through its relations.
    #[error("relation cycle detected at {id}")]
    CycleDetected {
        /// The identifier that reappeared among its own ancestors.
        id: String,
    },

    /// Relations nest deeper than the configured limit.
    #[error("relation depth exceeded at {id}: limit is {max_depth}")]
    DepthExceeded {
        /// First identifier of the item that crossed the limit.
        id: String,
        max_depth: usize,
    },
}

/// Convenience alias for indexer results.
pub type GraphResult<T> = Result<T, GraphError>;
