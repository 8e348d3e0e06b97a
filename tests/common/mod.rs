#![allow(dead_code)]

use async_trait::async_trait;
use pgshards::{ConnectionProvider, Result, ShardError};
use std::sync::Mutex;

/// Connection handle handed out by [`FakeProvider`].
#[derive(Debug, PartialEq, Eq)]
pub struct FakeConnection {
    pub identifier: String,
}

/// Provider that records every open and fails on chosen identifiers.
#[derive(Default)]
pub struct FakeProvider {
    failing: Vec<String>,
    opened: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(identifier: &str) -> Self {
        Self {
            failing: vec![identifier.to_string()],
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConnectionProvider for FakeProvider {
    type Connection = FakeConnection;

    async fn open(&self, identifier: &str) -> Result<FakeConnection> {
        if self.failing.iter().any(|f| f == identifier) {
            return Err(ShardError::ConfigurationError("connection refused".to_string()));
        }
        self.opened.lock()?.push(identifier.to_string());
        Ok(FakeConnection {
            identifier: identifier.to_string(),
        })
    }
}
