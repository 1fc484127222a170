//! Local key-value store for the money manager client
//!
//! This module provides the persisted string storage used by the session
//! store and the notification log. A Redis-backed adapter is used in
//! production and an in-memory adapter backs tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Persisted string storage that survives application restarts
///
/// Integers are stored as their decimal representation and structured
/// values as JSON strings; callers own the encoding.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Set a key-value pair, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete a key; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Check if the store is reachable
    async fn health_check(&self) -> StoreResult<bool>;
}

/// Configuration for the Redis-backed store
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
    /// Prefix applied to every key written by this client
    pub namespace: String,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    /// - `REDIS_NAMESPACE`: Key prefix (default: "money_manager")
    pub fn from_env() -> StoreResult<Self> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let namespace =
            std::env::var("REDIS_NAMESPACE").unwrap_or_else(|_| "money_manager".to_string());

        if namespace.trim().is_empty() {
            return Err(StoreError::Configuration(
                "REDIS_NAMESPACE must not be empty".to_string(),
            ));
        }

        Ok(RedisConfig { url, namespace })
    }
}

/// Redis-backed key-value store
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    namespace: String,
}

impl RedisStore {
    /// Initialize a new Redis store
    pub fn new(config: &RedisConfig) -> StoreResult<Self> {
        let client = Client::open(config.url.clone()).map_err(StoreError::Connection)?;
        info!(
            "Redis store initialized with URL: {} (namespace: {})",
            config.url, config.namespace
        );
        Ok(RedisStore {
            client,
            namespace: config.namespace.clone(),
        })
    }

    /// Derive a store whose keys live under `{namespace}:{suffix}`
    pub fn scoped(&self, suffix: &str) -> Self {
        RedisStore {
            client: self.client.clone(),
            namespace: format!("{}:{}", self.namespace, suffix),
        }
    }

    /// The key prefix used by this store
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    async fn get_connection(&self) -> StoreResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(StoreError::Connection)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn
            .get(self.namespaced(key))
            .await
            .map_err(StoreError::Command)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.get_connection().await?;
        let _: () = conn
            .set(self.namespaced(key), value)
            .await
            .map_err(StoreError::Command)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.get_connection().await?;
        let _: u64 = conn
            .del(self.namespaced(key))
            .await
            .map_err(StoreError::Command)?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(StoreError::Command)?;
        Ok(pong == "PONG")
    }
}

/// In-memory key-value store
///
/// Clones share the same map, so a clone handed to freshly constructed
/// services sees everything written before, like a device store across
/// an app restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!("Memory store set: {}", key);
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}
