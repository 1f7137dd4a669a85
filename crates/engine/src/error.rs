// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the lock engine

use redlease_adapters::StoreError;
use redlease_core::ConfigError;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by lock and release
#[derive(Debug, Error)]
pub enum LockError {
    /// The lock is held with a different secret. Retrying will not help
    /// until the holder releases it or its lease lapses.
    #[error("lock {name} is held with a different secret")]
    Mismatch { name: String },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// The lease could lapse before the scheduler first renews it
    #[error("ttl {ttl:?} must be longer than the renew interval {interval:?}")]
    TtlTooShort { ttl: Duration, interval: Duration },
    #[error("lock manager is closed")]
    Closed,
}

impl LockError {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, LockError::Mismatch { .. })
    }

    /// Whether the same call may succeed if retried later
    pub fn is_transient(&self) -> bool {
        match self {
            LockError::Store(e) => e.is_transient(),
            LockError::Mismatch { .. } | LockError::TtlTooShort { .. } | LockError::Closed => {
                false
            }
        }
    }
}

/// Errors from starting a lock manager
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("store health check {op} failed: {source}")]
    HealthCheck {
        op: &'static str,
        source: StoreError,
    },
}
