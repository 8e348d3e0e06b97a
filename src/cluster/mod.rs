pub mod config;
pub mod hash;
pub mod strategy;

use crate::connection::config::mask_password;
use crate::core::{Result, ShardError};
use crate::interface::ConnectionProvider;
use futures::future::try_join_all;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub use config::ClusterConfig;
pub use strategy::{ShardRouter, ShardSelector, ShardStrategy};

/// A shard picked by one of the selection strategies.
#[derive(Debug)]
pub struct ShardRef<'a, C> {
    /// Position of the shard in the cluster's canonical ordering
    pub index: usize,
    /// Connection identifier the shard was registered with
    pub identifier: &'a str,
    /// Shared connection handle
    pub connection: &'a Arc<C>,
}

impl<C> Clone for ShardRef<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ShardRef<'_, C> {}

/// Registry of shard connections and the strategies for choosing among them
///
/// Each identifier supplied at construction is opened eagerly and assigned
/// the index of its position in the input. The mapping never changes for the
/// lifetime of the cluster. Connections are owned by the cluster but never
/// closed by it.
///
/// # Examples
///
/// ```
/// use pgshards::{LazyConnectionProvider, ShardCluster};
///
/// # #[tokio::main]
/// # async fn main() -> pgshards::Result<()> {
/// let provider = LazyConnectionProvider::new();
/// let cluster = ShardCluster::connect(
///     &provider,
///     ["postgres://db-0/app", "postgres://db-1/app"],
/// )
/// .await?;
///
/// assert_eq!(cluster.next_shard().index, 0);
/// assert_eq!(cluster.next_shard().index, 1);
/// assert_eq!(cluster.next_shard().index, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ShardCluster<C> {
    /// Identifier -> connection handle
    connections: HashMap<String, Arc<C>>,
    /// Index -> identifier, in construction order
    index_to_identifier: Vec<String>,
    /// Index the next round-robin call returns
    cursor: AtomicUsize,
}

impl<C> ShardCluster<C> {
    /// Open every identifier through `provider` and build the cluster.
    ///
    /// Opens run concurrently; indices still follow input order. Any single
    /// failure aborts construction with [`ShardError::ConnectionError`].
    pub async fn connect<P, I, S>(provider: &P, identifiers: I) -> Result<Self>
    where
        P: ConnectionProvider<Connection = C> + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identifiers: Vec<String> = identifiers.into_iter().map(Into::into).collect();
        validate_identifiers(&identifiers)?;

        let opened = try_join_all(identifiers.iter().map(|identifier| async move {
            let connection = provider.open(identifier).await.map_err(|e| {
                warn!(
                    "Failed to open shard '{}': {}",
                    mask_password(identifier),
                    e
                );
                match e {
                    ShardError::ConnectionError { .. } => e,
                    other => ShardError::connection(identifier.as_str(), other),
                }
            })?;
            debug!("Opened shard '{}'", mask_password(identifier));
            Ok::<_, ShardError>(connection)
        }))
        .await?;

        Self::from_connections(identifiers.into_iter().zip(opened))
    }

    /// Register connections that were opened elsewhere, in the given order.
    pub fn from_connections<I, S>(connections: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
    {
        let (index_to_identifier, handles): (Vec<String>, Vec<C>) = connections
            .into_iter()
            .map(|(identifier, connection)| (identifier.into(), connection))
            .unzip();
        validate_identifiers(&index_to_identifier)?;

        let connections = index_to_identifier
            .iter()
            .cloned()
            .zip(handles.into_iter().map(Arc::new))
            .collect();

        info!("Shard cluster ready with {} shards", index_to_identifier.len());

        Ok(Self {
            connections,
            index_to_identifier,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Number of shards.
    pub fn len(&self) -> usize {
        self.index_to_identifier.len()
    }

    /// Always false: construction rejects an empty identifier list.
    pub fn is_empty(&self) -> bool {
        self.index_to_identifier.is_empty()
    }

    /// Identifiers in index order.
    pub fn identifiers(&self) -> &[String] {
        &self.index_to_identifier
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.connections.contains_key(identifier)
    }

    /// Index assigned to `identifier`, if registered.
    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.index_to_identifier
            .iter()
            .position(|registered| registered == identifier)
    }

    /// Shard registered at `index`.
    pub fn shard_at(&self, index: usize) -> Option<ShardRef<'_, C>> {
        let identifier = self.index_to_identifier.get(index)?;
        let connection = self.connections.get(identifier)?;
        Some(ShardRef {
            index,
            identifier,
            connection,
        })
    }

    /// All shards in index order.
    pub fn iter(&self) -> impl Iterator<Item = ShardRef<'_, C>> {
        (0..self.len()).filter_map(move |index| self.shard_at(index))
    }

    /// Next shard of the round-robin cycle `0, 1, .., N-1, 0, ..`.
    ///
    /// The first call on a fresh cluster returns index 0. The cursor advances
    /// atomically, so concurrent callers each get a distinct step.
    pub fn next_shard(&self) -> ShardRef<'_, C> {
        let len = self.len();
        let index = match self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(if current + 1 >= len { 0 } else { current + 1 })
            }) {
            Ok(previous) | Err(previous) => previous,
        };
        debug!("Round-robin selected shard {}", index);
        self.shard(index)
    }

    /// Shard chosen by `crc32(value) mod N`.
    pub fn hash_string_shard(&self, value: &str) -> ShardRef<'_, C> {
        let index = hash::shard_index_for(value, self.len());
        debug!("Hash selected shard {}", index);
        self.shard(index)
    }

    /// Direct lookup by connection identifier.
    ///
    /// Returns `None` as the handle when `identifier` is not registered; the
    /// identifier is handed back unchanged either way.
    pub fn connect_string_shard<'a>(&'a self, identifier: &'a str) -> (Option<&'a Arc<C>>, &'a str) {
        (self.connections.get(identifier), identifier)
    }

    /// Select a shard with `strategy`, using `key` as the hashed value or
    /// the identifier. Round-robin ignores `key`.
    pub fn select(&self, strategy: ShardStrategy, key: &str) -> Option<ShardRef<'_, C>> {
        match strategy {
            ShardStrategy::RoundRobin => Some(self.next_shard()),
            ShardStrategy::Hash => Some(self.hash_string_shard(key)),
            ShardStrategy::Direct => self.index_of(key).and_then(|index| self.shard_at(index)),
        }
    }

    fn shard(&self, index: usize) -> ShardRef<'_, C> {
        let identifier = &self.index_to_identifier[index];
        ShardRef {
            index,
            identifier,
            connection: &self.connections[identifier],
        }
    }
}

pub(crate) fn validate_identifiers(identifiers: &[String]) -> Result<()> {
    if identifiers.is_empty() {
        return Err(ShardError::ConfigurationError(
            "at least one shard identifier is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for identifier in identifiers {
        if identifier.trim().is_empty() {
            return Err(ShardError::ConfigurationError(
                "shard identifier must not be empty".to_string(),
            ));
        }
        if !seen.insert(identifier.as_str()) {
            return Err(ShardError::ConfigurationError(format!(
                "shard identifier '{}' appears more than once",
                mask_password(identifier)
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(ids: &[&str]) -> ShardCluster<String> {
        ShardCluster::from_connections(ids.iter().map(|id| (*id, format!("conn-{}", id)))).unwrap()
    }

    #[test]
    fn test_indices_follow_input_order() {
        let cluster = cluster(&["c", "a", "b"]);
        assert_eq!(cluster.identifiers(), ["c", "a", "b"]);
        assert_eq!(cluster.index_of("a"), Some(1));
        assert_eq!(cluster.shard_at(2).unwrap().connection.as_str(), "conn-b");
        assert!(cluster.shard_at(3).is_none());
    }

    #[test]
    fn test_single_shard_round_robin() {
        let cluster = cluster(&["only"]);
        for _ in 0..3 {
            assert_eq!(cluster.next_shard().index, 0);
        }
    }

    #[test]
    fn test_cursor_stays_in_range() {
        let cluster = cluster(&["a", "b", "c"]);
        for _ in 0..10 {
            cluster.next_shard();
            assert!(cluster.cursor.load(Ordering::SeqCst) < cluster.len());
        }
    }

    #[test]
    fn test_select_direct_unknown() {
        let cluster = cluster(&["a", "b"]);
        assert!(cluster.select(ShardStrategy::Direct, "z").is_none());
        assert_eq!(cluster.select(ShardStrategy::Direct, "b").unwrap().index, 1);
    }

    #[test]
    fn test_validate_identifiers() {
        assert!(validate_identifiers(&[]).is_err());
        assert!(validate_identifiers(&["a".to_string(), " ".to_string()]).is_err());
        assert!(validate_identifiers(&["a".to_string(), "a".to_string()]).is_err());
        assert!(validate_identifiers(&["a".to_string(), "b".to_string()]).is_ok());
    }
}
