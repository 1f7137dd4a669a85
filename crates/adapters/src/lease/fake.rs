// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory lease store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LeaseStore, StoreError};
use async_trait::async_trait;
use redlease_core::{ttl_seconds, Clock, SystemClock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Acquire {
        key: String,
        secret: String,
        ttl: Duration,
    },
    Renew {
        key: String,
        secret: String,
        ttl: Duration,
    },
    Release {
        key: String,
        secret: String,
    },
}

impl StoreCall {
    pub fn key(&self) -> &str {
        match self {
            StoreCall::Acquire { key, .. }
            | StoreCall::Renew { key, .. }
            | StoreCall::Release { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone)]
struct FakeLease {
    secret: String,
    expires_at: Instant,
}

/// Fake lease store with the same conditional semantics as the Redis scripts.
///
/// Expiry follows the supplied clock and, like Redis `EX`, is applied in
/// whole seconds.
#[derive(Clone)]
pub struct FakeLeaseStore<C = SystemClock> {
    leases: Arc<Mutex<HashMap<String, FakeLease>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    unavailable: Arc<AtomicBool>,
    clock: C,
}

impl FakeLeaseStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for FakeLeaseStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FakeLeaseStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            leases: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            unavailable: Arc::new(AtomicBool::new(false)),
            clock,
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Current holder of `key`, if its lease has not expired
    pub fn holder(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        self.leases
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .filter(|lease| lease.expires_at > now)
            .map(|lease| lease.secret.clone())
    }

    /// Time left on the lease for `key`
    pub fn remaining(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        self.leases
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .filter(|lease| lease.expires_at > now)
            .map(|lease| lease.expires_at - now)
    }

    /// Make every call fail as if the server were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Overwrite `key` as another process would after our lease lapsed
    pub fn take_over(&self, key: &str, secret: &str, ttl: Duration) {
        let lease = self.lease(secret, ttl);
        self.leases
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), lease);
    }

    fn lease(&self, secret: &str, ttl: Duration) -> FakeLease {
        FakeLease {
            secret: secret.to_string(),
            expires_at: self.clock.now() + Duration::from_secs(ttl_seconds(ttl)),
        }
    }

    fn record(&self, call: StoreCall) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    /// Live secret for `key`, dropping the entry if it has expired
    fn live_secret(leases: &mut HashMap<String, FakeLease>, key: &str, now: Instant) -> Option<String> {
        match leases.get(key) {
            Some(lease) if lease.expires_at > now => Some(lease.secret.clone()),
            Some(_) => {
                leases.remove(key);
                None
            }
            None => None,
        }
    }
}

#[async_trait]
impl<C: Clock> LeaseStore for FakeLeaseStore<C> {
    async fn acquire(&self, key: &str, secret: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.record(StoreCall::Acquire {
            key: key.to_string(),
            secret: secret.to_string(),
            ttl,
        })?;

        let mut leases = self.leases.lock().unwrap_or_else(|e| e.into_inner());
        match Self::live_secret(&mut leases, key, self.clock.now()) {
            Some(current) if current != secret => Ok(false),
            _ => {
                leases.insert(key.to_string(), self.lease(secret, ttl));
                Ok(true)
            }
        }
    }

    async fn renew(&self, key: &str, secret: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.record(StoreCall::Renew {
            key: key.to_string(),
            secret: secret.to_string(),
            ttl,
        })?;

        let mut leases = self.leases.lock().unwrap_or_else(|e| e.into_inner());
        match Self::live_secret(&mut leases, key, self.clock.now()) {
            Some(current) if current == secret => {
                leases.insert(key.to_string(), self.lease(secret, ttl));
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release(&self, key: &str, secret: &str) -> Result<bool, StoreError> {
        self.record(StoreCall::Release {
            key: key.to_string(),
            secret: secret.to_string(),
        })?;

        let mut leases = self.leases.lock().unwrap_or_else(|e| e.into_inner());
        match Self::live_secret(&mut leases, key, self.clock.now()) {
            None => Ok(true),
            Some(current) if current == secret => {
                leases.remove(key);
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
