//! Sleeper and observer that remember what they were asked.

use futures::future::{self, BoxFuture, FutureExt};
use quorum_lock::observer::{FailedAttempt, LockObserver};
use quorum_lock::timing::Sleeper;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records requested delays and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        self.delays.lock().unwrap().push(duration);
        future::ready(()).boxed()
    }
}

/// Keeps every failed attempt it is told about.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    attempts: Arc<Mutex<Vec<FailedAttempt>>>,
}

impl RecordingObserver {
    pub fn attempts(&self) -> Vec<FailedAttempt> {
        self.attempts.lock().unwrap().clone()
    }
}

impl LockObserver for RecordingObserver {
    fn on_failed_attempt(&self, attempt: &FailedAttempt) {
        self.attempts.lock().unwrap().push(attempt.clone());
    }
}
