// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic lease operations
//!
//! A lock is owned by a secret iff the store holds exactly that secret under
//! the lock's key. These three operations are the only writers of that key,
//! and each one is evaluated by the store in a single step so no other client
//! can interleave between its read and its conditional write.

mod redis;

pub use self::redis::RedisLeaseStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLeaseStore, StoreCall};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors from reaching the store.
///
/// Losing ownership is not an error at this layer: the operations report it
/// as `Ok(false)`, so callers can tell "not mine" from "couldn't ask".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },
    #[error("unexpected reply to {op}: {reply}")]
    UnexpectedReply { op: &'static str, reply: i64 },
}

impl StoreError {
    /// Whether retrying the same call later might succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout { .. })
    }
}

/// The atomic operation set behind a lease lock
#[async_trait]
pub trait LeaseStore: Clone + Send + Sync + 'static {
    /// Take the lease if it is free or already ours, setting its expiry to `ttl`.
    ///
    /// Returns `false` without touching the key when another secret holds it.
    async fn acquire(&self, key: &str, secret: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Re-arm the lease to `ttl` if `secret` still holds it.
    ///
    /// Returns `false` when the key is absent or held by another secret.
    async fn renew(&self, key: &str, secret: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Delete the lease if `secret` holds it.
    ///
    /// An absent key counts as released. Returns `false` only when another
    /// secret holds the key.
    async fn release(&self, key: &str, secret: &str) -> Result<bool, StoreError>;
}
