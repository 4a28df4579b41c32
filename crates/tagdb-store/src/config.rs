use serde::{Deserialize, Serialize};

/// Configuration for [`InMemoryTagStore`](crate::InMemoryTagStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of identifiers the entry and index maps are pre-sized for.
    pub initial_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
        }
    }
}
