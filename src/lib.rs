// ============================================================================
// pgshards Library
// ============================================================================

//! Shard selection over a fixed set of PostgreSQL connections.
//!
//! A [`ShardCluster`] opens one connection per identifier through a
//! [`ConnectionProvider`] and offers three ways to pick among them:
//! round-robin ([`ShardCluster::next_shard`]), CRC-32 hashing compatible with
//! pghashlib's `hash64(value, 'crc32')` ([`ShardCluster::hash_string_shard`]),
//! and direct lookup by identifier ([`ShardCluster::connect_string_shard`]).
//! [`ShardRouter`] binds a cluster to a strategy picked by configuration.

pub mod core;
pub mod connection;
pub mod cluster;
pub mod interface;

// Re-export main types for convenience
pub use crate::core::{Result, ShardError};
pub use interface::ConnectionProvider;

pub use cluster::{
    ClusterConfig, ShardCluster, ShardRef, ShardRouter, ShardSelector, ShardStrategy,
    hash::{crc32, shard_index_for},
};

// Re-export connection API
pub use connection::{
    LazyConnectionProvider, ShardConnection,
    config::ConnectionConfig,
};

#[cfg(feature = "postgres")]
pub use connection::postgres::PostgresProvider;
