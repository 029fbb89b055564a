//! Configuration and connection of Redis lock stores.

use fred::prelude::*;
use quorum_lock_core::drift::ClockDrift;
use quorum_lock_core::error::{LockError, LockResult};

use crate::store::RedisLockStore;

/// Builder for a [`RedisLockStore`].
///
/// # Example
///
/// ```rust,ignore
/// let store = RedisLockStore::builder()
///     .url("redis://localhost:6379")
///     .key_prefix("locks:")
///     .build()
///     .await?;
/// ```
pub struct RedisLockStoreBuilder {
    url: Option<String>,
    client: Option<RedisClient>,
    key_prefix: String,
    drift: ClockDrift,
}

impl RedisLockStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: None,
            client: None,
            key_prefix: String::new(),
            drift: ClockDrift::REDIS,
        }
    }

    /// Sets the Redis server URL to connect to.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Uses an existing Redis client instead of connecting to a URL.
    pub fn client(mut self, client: RedisClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Prepended to every resource name to form the Redis key. Empty by default.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Sets the drift policy. Defaults to [`ClockDrift::REDIS`].
    pub fn drift(mut self, drift: ClockDrift) -> Self {
        self.drift = drift;
        self
    }

    /// Builds the store, connecting first when a URL was given.
    pub async fn build(self) -> LockResult<RedisLockStore> {
        let client = match (self.client, self.url) {
            (Some(client), _) => client,
            (None, Some(url)) => connect(&url).await?,
            (None, None) => {
                return Err(LockError::InvalidConfiguration(
                    "no Redis client or URL provided".to_string(),
                ));
            }
        };

        Ok(RedisLockStore::new(client, self.key_prefix, self.drift))
    }
}

impl Default for RedisLockStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn connect(url: &str) -> LockResult<RedisClient> {
    let config = RedisConfig::from_url(url).map_err(|e| {
        LockError::Connection(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid Redis URL: {}", e),
        )))
    })?;

    let client = RedisClient::new(config, None, None, None);
    client.connect();
    client.wait_for_connect().await.map_err(|e| {
        LockError::Connection(Box::new(std::io::Error::other(format!(
            "failed to connect to Redis: {}",
            e
        ))))
    })?;

    Ok(client)
}

/// Connects one store per URL, for use as the stores of a multi-store locker.
pub async fn connect_all(urls: &[impl AsRef<str>]) -> LockResult<Vec<RedisLockStore>> {
    let mut stores = Vec::with_capacity(urls.len());
    for url in urls {
        stores.push(RedisLockStore::connect(url.as_ref()).await?);
    }
    Ok(stores)
}
