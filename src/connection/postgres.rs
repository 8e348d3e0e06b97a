use crate::core::{Result, ShardError};
use crate::interface::ConnectionProvider;
use async_trait::async_trait;
use log::warn;
use tokio_postgres::{Client, NoTls};

/// Provider that opens a live `tokio_postgres::Client` per shard
///
/// The connection driver future is spawned onto the current tokio runtime and
/// lives as long as the returned client.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresProvider;

impl PostgresProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConnectionProvider for PostgresProvider {
    type Connection = Client;

    async fn open(&self, identifier: &str) -> Result<Client> {
        let (client, connection) = tokio_postgres::connect(identifier, NoTls)
            .await
            .map_err(|e| ShardError::connection(identifier, e))?;

        let masked = super::config::mask_password(identifier);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("Connection error on shard '{}': {}", masked, e);
            }
        });

        Ok(client)
    }
}
