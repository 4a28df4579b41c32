use serde::{Deserialize, Serialize};

/// Configuration for the [`GraphIndexer`](crate::GraphIndexer).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Fail with [`GraphError::CycleDetected`](crate::GraphError) when an
    /// item is its own ancestor, or when one of its identifiers is already
    /// among its ancestors' identifiers. When disabled, a cyclic relation
    /// graph recurses without bound.
    pub detect_cycles: bool,
    /// Maximum relation depth below a root item. `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_depth: None,
        }
    }
}

impl IndexerConfig {
    /// The unguarded walk: no cycle detection, no depth limit.
    pub fn unchecked() -> Self {
        Self {
            detect_cycles: false,
            max_depth: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = IndexerConfig::default();
        assert!(c.detect_cycles);
        assert!(c.max_depth.is_none());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let c: IndexerConfig = serde_json::from_str(r#"{"max_depth": 3}"#).unwrap();
        assert!(c.detect_cycles);
        assert_eq!(c.max_depth, Some(3));
    }
}
