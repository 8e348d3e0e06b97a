use super::{ClusterConfig, ShardCluster, ShardRef};
use crate::core::Result;
use crate::interface::ConnectionProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Shard selection strategy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShardStrategy {
    /// Cycle through shards in index order, ignoring the key.
    #[default]
    RoundRobin,
    /// `crc32(key) mod N`.
    Hash,
    /// The key is a connection identifier.
    Direct,
}

impl fmt::Display for ShardStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShardStrategy::RoundRobin => "round_robin",
            ShardStrategy::Hash => "hash",
            ShardStrategy::Direct => "direct",
        };
        f.write_str(name)
    }
}

impl FromStr for ShardStrategy {
    type Err = crate::core::ShardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "round_robin" | "round-robin" | "roundrobin" => Ok(ShardStrategy::RoundRobin),
            "hash" | "crc32" => Ok(ShardStrategy::Hash),
            "direct" | "connect_string" => Ok(ShardStrategy::Direct),
            other => Err(crate::core::ShardError::ConfigurationError(format!(
                "unknown shard strategy '{}'",
                other
            ))),
        }
    }
}

/// Anything that can pick a shard for a key.
pub trait ShardSelector<C> {
    /// Pick a shard for `key`, or `None` when the key names no shard.
    fn select(&self, key: &str) -> Option<ShardRef<'_, C>>;
}

/// A cluster bound to one strategy, chosen by configuration.
///
/// Cheap to clone; clones share the cluster and its round-robin cursor.
#[derive(Debug)]
pub struct ShardRouter<C> {
    cluster: Arc<ShardCluster<C>>,
    strategy: ShardStrategy,
}

impl<C> Clone for ShardRouter<C> {
    fn clone(&self) -> Self {
        Self {
            cluster: Arc::clone(&self.cluster),
            strategy: self.strategy,
        }
    }
}

impl<C> ShardRouter<C> {
    pub fn new(cluster: Arc<ShardCluster<C>>, strategy: ShardStrategy) -> Self {
        Self { cluster, strategy }
    }

    /// Build a cluster from `config` and bind its strategy.
    pub async fn connect<P>(provider: &P, config: &ClusterConfig) -> Result<Self>
    where
        P: ConnectionProvider<Connection = C> + ?Sized,
    {
        config.validate()?;
        let cluster = ShardCluster::connect(provider, config.shards.iter().cloned()).await?;
        Ok(Self::new(Arc::new(cluster), config.strategy))
    }

    /// Same cluster, different strategy.
    pub fn with_strategy(&self, strategy: ShardStrategy) -> Self {
        Self::new(Arc::clone(&self.cluster), strategy)
    }

    pub fn strategy(&self) -> ShardStrategy {
        self.strategy
    }

    pub fn cluster(&self) -> &Arc<ShardCluster<C>> {
        &self.cluster
    }
}

impl<C> ShardSelector<C> for ShardRouter<C> {
    fn select(&self, key: &str) -> Option<ShardRef<'_, C>> {
        self.cluster.select(self.strategy, key)
    }
}
