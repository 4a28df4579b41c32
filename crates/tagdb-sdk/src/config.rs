use serde::{Deserialize, Serialize};

use tagdb_graph::IndexerConfig;
use tagdb_store::StoreConfig;

use crate::error::SdkResult;

/// Top-level configuration for a [`TagDb`](crate::TagDb).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagDbConfig {
    pub store: StoreConfig,
    pub indexer: IndexerConfig,
}

impl TagDbConfig {
    /// Parse a JSON document. Missing sections and fields take their
    /// defaults.
    pub fn from_json(json: &str) -> SdkResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> SdkResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
