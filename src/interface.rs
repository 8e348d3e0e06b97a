use async_trait::async_trait;
use crate::core::Result;

/// A factory that opens one shard's connection from its identifier.
///
/// This trait keeps the cluster agnostic of the database client in use.
/// [`LazyConnectionProvider`](crate::LazyConnectionProvider) validates the
/// identifier without touching the network; with the `postgres` feature,
/// `PostgresProvider` opens a real `tokio_postgres::Client`. Tests plug in
/// their own fakes.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    type Connection: Send + Sync + 'static;

    /// Open the connection named by `identifier` (typically a connection URI).
    ///
    /// Errors are reported against the identifier by the caller, so
    /// implementations only need to describe the cause.
    async fn open(&self, identifier: &str) -> Result<Self::Connection>;
}
