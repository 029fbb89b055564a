//! Redis implementation of the lock store contract.

use std::time::Duration;

use fred::prelude::*;
use fred::types::CustomCommand;
use quorum_lock_core::drift::ClockDrift;
use quorum_lock_core::error::{LockError, LockResult};
use quorum_lock_core::lock::Lock;
use quorum_lock_core::store::LockStore;
use tracing::instrument;

use crate::builder::RedisLockStoreBuilder;

/// A single Redis server used as a lock store.
///
/// Locks are plain string keys holding the owner's token:
///
/// - `set` is `SET key token NX [PX ttl]`,
/// - `exists` is `EXISTS key`,
/// - `delete` runs a script deleting the key only while it holds the token.
#[derive(Clone)]
pub struct RedisLockStore {
    client: RedisClient,
    key_prefix: String,
    drift: ClockDrift,
}

impl RedisLockStore {
    /// Compare-and-delete, executed atomically by the server.
    const RELEASE_SCRIPT_LUA: &'static str = r#"
        if redis.call('get', KEYS[1]) == ARGV[1] then
            return redis.call('del', KEYS[1])
        end
        return 0
    "#;

    pub(crate) fn new(client: RedisClient, key_prefix: String, drift: ClockDrift) -> Self {
        Self {
            client,
            key_prefix,
            drift,
        }
    }

    /// Returns a new builder for configuring the store.
    pub fn builder() -> RedisLockStoreBuilder {
        RedisLockStoreBuilder::new()
    }

    /// Connects to the given Redis URL with default settings.
    pub async fn connect(url: impl Into<String>) -> LockResult<Self> {
        Self::builder().url(url).build().await
    }

    /// Wraps an already connected client.
    pub fn from_client(client: RedisClient) -> Self {
        Self::new(client, String::new(), ClockDrift::REDIS)
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    /// Redis key holding the lock of `resource`.
    pub fn key_for(&self, resource: &str) -> String {
        format!("{}{}", self.key_prefix, resource)
    }

    fn backend_error(command: &str, e: RedisError) -> LockError {
        LockError::Backend(Box::new(std::io::Error::other(format!(
            "Redis {} failed: {}",
            command, e
        ))))
    }
}

impl LockStore for RedisLockStore {
    #[instrument(skip(self, lock), fields(resource = %lock.resource(), backend = "redis"))]
    async fn set(&self, lock: &Lock, ttl: Option<Duration>) -> LockResult<bool> {
        let expiration = ttl
            .filter(|ttl| !ttl.is_zero())
            .map(|ttl| Expiration::PX(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)));

        // SET NX returns Some(value) if key was set, None if key already exists
        let result: Option<String> = self
            .client
            .set(
                self.key_for(lock.resource()),
                lock.token(),
                expiration,
                Some(SetOptions::NX),
                false,
            )
            .await
            .map_err(|e| Self::backend_error("SET NX", e))?;

        Ok(result.is_some())
    }

    #[instrument(skip(self), fields(backend = "redis"))]
    async fn exists(&self, resource: &str) -> LockResult<bool> {
        let count: i64 = self
            .client
            .exists(self.key_for(resource))
            .await
            .map_err(|e| Self::backend_error("EXISTS", e))?;

        Ok(count > 0)
    }

    #[instrument(skip(self, lock), fields(resource = %lock.resource(), backend = "redis"))]
    async fn delete(&self, lock: &Lock) -> LockResult<bool> {
        let args: Vec<RedisValue> = vec![
            Self::RELEASE_SCRIPT_LUA.into(),
            1_i64.into(), // numkeys
            self.key_for(lock.resource()).into(),
            lock.token().into(),
        ];

        let cmd = CustomCommand::new_static("EVAL", None, false);

        let deleted: i64 = self
            .client
            .custom(cmd, args)
            .await
            .map_err(|e| Self::backend_error("EVAL (release)", e))?;

        Ok(deleted == 1)
    }

    fn drift(&self, ttl: Option<Duration>) -> Duration {
        self.drift.for_ttl(ttl)
    }

    fn is_ready(&self) -> bool {
        self.client.is_connected()
    }
}
