//! Lock store whose answers are scripted by the test.

use quorum_lock::{ClockDrift, Lock, LockError, LockResult, LockStore};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted store answers to `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetBehavior {
    Accept,
    Reject,
    Fail,
    Hang,
}

#[derive(Debug, Default)]
struct Calls {
    set_tokens: Vec<String>,
    delete_tokens: Vec<String>,
    exists: usize,
}

/// Scripted lock store. Clones share their call log.
#[derive(Debug, Clone)]
pub struct ScriptedStore {
    set_behavior: SetBehavior,
    latency: Duration,
    drift: ClockDrift,
    delete_result: bool,
    exists_result: bool,
    ready: bool,
    calls: Arc<Mutex<Calls>>,
}

impl ScriptedStore {
    fn with_behavior(set_behavior: SetBehavior) -> Self {
        Self {
            set_behavior,
            latency: Duration::ZERO,
            drift: ClockDrift::REDIS,
            delete_result: true,
            exists_result: false,
            ready: true,
            calls: Arc::new(Mutex::new(Calls::default())),
        }
    }

    pub fn accepting() -> Self {
        Self::with_behavior(SetBehavior::Accept)
    }

    pub fn rejecting() -> Self {
        Self::with_behavior(SetBehavior::Reject)
    }

    /// `set` returns a backend error.
    pub fn failing() -> Self {
        Self::with_behavior(SetBehavior::Fail)
    }

    /// `set` never completes.
    pub fn hanging() -> Self {
        Self::with_behavior(SetBehavior::Hang)
    }

    /// Every `set` takes this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fixed drift, whatever the TTL.
    pub fn with_drift(mut self, drift: Duration) -> Self {
        self.drift = ClockDrift::new(0, drift);
        self
    }

    pub fn deleting(mut self, deleted: bool) -> Self {
        self.delete_result = deleted;
        self
    }

    pub fn reporting_exists(mut self, exists: bool) -> Self {
        self.exists_result = exists;
        self
    }

    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn set_tokens(&self) -> Vec<String> {
        self.calls.lock().unwrap().set_tokens.clone()
    }

    pub fn set_calls(&self) -> usize {
        self.calls.lock().unwrap().set_tokens.len()
    }

    pub fn delete_tokens(&self) -> Vec<String> {
        self.calls.lock().unwrap().delete_tokens.clone()
    }

    pub fn delete_calls(&self) -> usize {
        self.calls.lock().unwrap().delete_tokens.len()
    }

    pub fn exists_calls(&self) -> usize {
        self.calls.lock().unwrap().exists
    }
}

impl LockStore for ScriptedStore {
    async fn set(&self, lock: &Lock, _ttl: Option<Duration>) -> LockResult<bool> {
        self.calls
            .lock()
            .unwrap()
            .set_tokens
            .push(lock.token().to_string());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.set_behavior {
            SetBehavior::Accept => Ok(true),
            SetBehavior::Reject => Ok(false),
            SetBehavior::Fail => Err(LockError::Backend(Box::new(std::io::Error::other(
                "store unreachable",
            )))),
            SetBehavior::Hang => std::future::pending().await,
        }
    }

    async fn exists(&self, _resource: &str) -> LockResult<bool> {
        self.calls.lock().unwrap().exists += 1;
        Ok(self.exists_result)
    }

    async fn delete(&self, lock: &Lock) -> LockResult<bool> {
        self.calls
            .lock()
            .unwrap()
            .delete_tokens
            .push(lock.token().to_string());
        Ok(self.delete_result)
    }

    fn drift(&self, ttl: Option<Duration>) -> Duration {
        self.drift.for_ttl(ttl)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}
