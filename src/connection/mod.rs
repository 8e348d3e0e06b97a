pub mod config;
#[cfg(feature = "postgres")]
pub mod postgres;

use crate::core::Result;
use crate::interface::ConnectionProvider;
use async_trait::async_trait;
use config::ConnectionConfig;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lazily-opened shard connection handle
///
/// Holds the parsed connection parameters of one shard. No socket is opened;
/// the SQL layer that receives this handle decides when and how to connect.
/// Similar to a `database/sql` handle right after `Open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardConnection {
    /// Unique connection ID
    id: u64,
    /// Identifier the handle was opened from
    identifier: String,
    /// Parsed connection parameters
    config: ConnectionConfig,
}

impl ShardConnection {
    pub(crate) fn new(id: u64, identifier: &str, config: ConnectionConfig) -> Self {
        Self {
            id,
            identifier: identifier.to_string(),
            config,
        }
    }

    /// Get connection ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the identifier this handle was opened from
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Get the parsed connection parameters
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}

/// Provider that parses identifiers into [`ShardConnection`] handles
///
/// Opening fails only when the identifier is not a valid PostgreSQL
/// connection URI.
#[derive(Debug)]
pub struct LazyConnectionProvider {
    next_id: AtomicU64,
}

impl LazyConnectionProvider {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for LazyConnectionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionProvider for LazyConnectionProvider {
    type Connection = ShardConnection;

    async fn open(&self, identifier: &str) -> Result<ShardConnection> {
        let config = ConnectionConfig::from_url(identifier)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(ShardConnection::new(id, identifier, config))
    }
}
