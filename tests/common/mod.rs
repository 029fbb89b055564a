//! Shared test doubles.

#![allow(dead_code)]

pub mod recording;
pub mod scripted_store;

/// Installs a test-friendly subscriber; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
