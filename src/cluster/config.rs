use super::strategy::ShardStrategy;
use super::validate_identifiers;
use crate::core::{Result, ShardError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable description of a shard cluster.
///
/// ```json
/// {
///   "shards": ["postgres://db-0/app", "postgres://db-1/app"],
///   "strategy": "hash"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Connection identifiers; their order fixes shard indices.
    pub shards: Vec<String>,
    /// Default strategy for routers built from this config.
    #[serde(default)]
    pub strategy: ShardStrategy,
}

impl ClusterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shard identifier
    pub fn shard(mut self, identifier: &str) -> Self {
        self.shards.push(identifier.to_string());
        self
    }

    /// Set the default strategy
    pub fn strategy(mut self, strategy: ShardStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Checks the shard list is non-empty, with no blank or duplicate entries.
    pub fn validate(&self) -> Result<()> {
        validate_identifiers(&self.shards)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ShardError::ConfigurationError(format!(
                "failed to read cluster config '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }
}
