// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock manager: the public face of the engine
//!
//! Acquires and releases named locks through a [`LeaseStore`], records held
//! locks in a [`LockRegistry`], and owns the [`RenewalScheduler`] that keeps
//! them alive until they are released or the manager is closed.

use crate::error::{LockError, StartupError};
use crate::registry::LockRegistry;
use crate::renewal::RenewalScheduler;
use redlease_adapters::LeaseStore;
use redlease_core::LockConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Manages lease locks held by this process
pub struct LockManager<S: LeaseStore> {
    store: S,
    registry: Arc<LockRegistry>,
    config: LockConfig,
    scheduler: Mutex<Option<RenewalScheduler>>,
    closed: AtomicBool,
}

impl<S: LeaseStore> LockManager<S> {
    /// Validate `config`, check the store, and start renewing.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(store: S, config: LockConfig) -> Result<Self, StartupError> {
        config.validate()?;
        health_check(&store, &config.check_key).await?;

        let registry = Arc::new(LockRegistry::new());
        let scheduler = RenewalScheduler::spawn(store.clone(), Arc::clone(&registry), config.clone());

        info!(
            acquire_ttl_ms = config.acquire_ttl.as_millis() as u64,
            renew_ttl_ms = config.renew_ttl.as_millis() as u64,
            "lock manager started"
        );

        Ok(Self {
            store,
            registry,
            config,
            scheduler: Mutex::new(Some(scheduler)),
            closed: AtomicBool::new(false),
        })
    }

    /// Acquire `name` with the configured acquisition TTL
    pub async fn lock(&self, name: &str, secret: &str) -> Result<(), LockError> {
        self.lock_with_ttl(name, secret, self.config.acquire_ttl).await
    }

    /// Acquire `name` for `ttl`, then keep it alive until released.
    ///
    /// Re-locking with the secret that already holds `name` succeeds and
    /// refreshes the lease. Renewals re-arm to the manager's `renew_ttl`,
    /// not to `ttl`. A `ttl` no longer than the renew interval is rejected
    /// before the store is contacted.
    pub async fn lock_with_ttl(
        &self,
        name: &str,
        secret: &str,
        ttl: Duration,
    ) -> Result<(), LockError> {
        if self.is_closed() {
            return Err(LockError::Closed);
        }
        if ttl <= self.config.renew_interval {
            return Err(LockError::TtlTooShort {
                ttl,
                interval: self.config.renew_interval,
            });
        }

        if !self.store.acquire(name, secret, ttl).await? {
            debug!(name, "lock held by another secret");
            return Err(LockError::Mismatch {
                name: name.to_string(),
            });
        }

        let generation = self.registry.insert(name, secret);

        // Lost a race with close(): its sweep may already have run, so this
        // lease would never be renewed or released.
        if self.is_closed() {
            if self.registry.remove_if_generation(name, generation) {
                if let Err(e) = self.store.release(name, secret).await {
                    warn!(name, error = %e, "failed to release lock acquired during close");
                }
            }
            return Err(LockError::Closed);
        }

        debug!(name, ttl_ms = ttl.as_millis() as u64, "lock acquired");
        Ok(())
    }

    /// Release `name` if `secret` holds it.
    ///
    /// Renewal stops before the store is contacted, so the entry is gone
    /// from the registry even when the store call fails. Releasing a lock
    /// that no longer exists succeeds.
    pub async fn release(&self, name: &str, secret: &str) -> Result<(), LockError> {
        let was_registered = self.registry.remove_if_held_by(name, secret);

        if !self.store.release(name, secret).await? {
            debug!(name, was_registered, "release refused: held by another secret");
            return Err(LockError::Mismatch {
                name: name.to_string(),
            });
        }

        debug!(name, was_registered, "lock released");
        Ok(())
    }

    /// Stop renewing and release every held lock.
    ///
    /// Waits for the renewal task to exit first. Releases are best-effort:
    /// failures are logged and the sweep continues. Later calls are no-ops.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let scheduler = self
            .scheduler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(scheduler) = scheduler {
            scheduler.stop().await;
        }

        let mut released = 0usize;
        let mut failed = 0usize;
        for lock in self.registry.snapshot() {
            if !self.registry.remove_if_generation(&lock.name, lock.generation) {
                continue;
            }
            let name = lock.name;
            match self.store.release(&name, &lock.secret).await {
                Ok(true) => released += 1,
                Ok(false) => {
                    failed += 1;
                    warn!(name = %name, "release on close refused: lease lost");
                }
                Err(e) => {
                    failed += 1;
                    warn!(name = %name, error = %e, "release on close failed");
                }
            }
        }

        info!(released, failed, "lock manager closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Whether `name` is registered for renewal
    pub fn is_held(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Names of every lock registered for renewal
    pub fn held(&self) -> Vec<String> {
        self.registry.names()
    }
}

impl<S: LeaseStore> Drop for LockManager<S> {
    fn drop(&mut self) {
        // Dropping the scheduler handle ends the renewal task; whatever is
        // still registered simply expires in the store.
        if !self.is_closed() && !self.registry.is_empty() {
            warn!(
                held = self.registry.len(),
                "lock manager dropped without close, leases will expire"
            );
        }
    }
}

/// Exercise all three operations once against `key` with a throwaway secret.
///
/// Only store failures matter here; whether the check key was free is
/// irrelevant.
async fn health_check<S: LeaseStore>(store: &S, key: &str) -> Result<(), StartupError> {
    let secret = uuid::Uuid::new_v4().to_string();
    let ttl = Duration::from_secs(1);

    store
        .acquire(key, &secret, ttl)
        .await
        .map_err(|source| StartupError::HealthCheck {
            op: "acquire",
            source,
        })?;
    store
        .release(key, &secret)
        .await
        .map_err(|source| StartupError::HealthCheck {
            op: "release",
            source,
        })?;
    store
        .renew(key, &secret, ttl)
        .await
        .map_err(|source| StartupError::HealthCheck { op: "renew", source })?;

    debug!(key, "store health check passed");
    Ok(())
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
