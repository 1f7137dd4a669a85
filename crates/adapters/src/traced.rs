// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::lease::{LeaseStore, StoreError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::Instrument;

/// Wrapper that adds tracing to any LeaseStore
#[derive(Clone)]
pub struct TracedLeaseStore<S> {
    inner: S,
}

impl<S> TracedLeaseStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: LeaseStore> LeaseStore for TracedLeaseStore<S> {
    async fn acquire(&self, key: &str, secret: &str, ttl: Duration) -> Result<bool, StoreError> {
        let span = tracing::info_span!("lease.acquire", key, ttl_ms = ttl.as_millis() as u64);

        async {
            let start = std::time::Instant::now();
            let result = self.inner.acquire(key, secret, ttl).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(true) => tracing::debug!(elapsed_ms, "acquired"),
                Ok(false) => tracing::debug!(elapsed_ms, "held by another secret"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "acquire failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn renew(&self, key: &str, secret: &str, ttl: Duration) -> Result<bool, StoreError> {
        let span = tracing::debug_span!("lease.renew", key);

        async {
            let result = self.inner.renew(key, secret, ttl).await;
            // renewals run every tick; only losses are worth more than trace
            match &result {
                Ok(true) => tracing::trace!("renewed"),
                Ok(false) => tracing::warn!("renew refused: lease lost"),
                Err(e) => tracing::warn!(error = %e, "renew failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn release(&self, key: &str, secret: &str) -> Result<bool, StoreError> {
        let span = tracing::info_span!("lease.release", key);

        async {
            let start = std::time::Instant::now();
            let result = self.inner.release(key, secret).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(true) => tracing::debug!(elapsed_ms, "released"),
                Ok(false) => tracing::warn!(elapsed_ms, "release refused: held by another secret"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "release failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
