// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background lease renewal
//!
//! One task per lock manager. Every `renew_interval` it re-arms each
//! registered lease to `renew_ttl`. Renewal failures never reach a caller:
//! they are logged, counted, and isolated to the entry that failed.

use crate::registry::{LockRegistry, RegisteredLock};
use redlease_adapters::LeaseStore;
use redlease_core::LockConfig;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Outcome of one renewal pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenewalReport {
    /// Leases re-armed
    pub renewed: usize,
    /// Leases now held by another secret, or expired
    pub lost: usize,
    /// Renewals that could not reach the store
    pub failed: usize,
}

/// Handle to a running renewal task
pub struct RenewalScheduler {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl RenewalScheduler {
    /// Start renewing every lease in `registry`.
    ///
    /// The task also exits if this handle is dropped without `stop`.
    pub fn spawn<S: LeaseStore>(store: S, registry: Arc<LockRegistry>, config: LockConfig) -> Self {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run(store, registry, config, shutdown_rx));
        Self { shutdown, handle }
    }

    /// Signal the task and wait until it has exited.
    ///
    /// No store call is issued after this returns.
    pub async fn stop(self) {
        let Self { shutdown, handle } = self;
        // Err means the task already exited and dropped its receiver
        let _ = shutdown.send(());
        if let Err(e) = handle.await {
            warn!(error = %e, "renewal task ended abnormally");
        }
    }

}

async fn run<S: LeaseStore>(
    store: S,
    registry: Arc<LockRegistry>,
    config: LockConfig,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(config.renew_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Skip initial immediate tick
    ticker.tick().await;

    info!(
        interval_ms = config.renew_interval.as_millis() as u64,
        renew_ttl_ms = config.renew_ttl.as_millis() as u64,
        "renewal scheduler started"
    );

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        // A pass in flight is abandoned on shutdown rather than finished.
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            report = renew_all(&store, &registry, &config) => {
                if report.lost > 0 || report.failed > 0 {
                    warn!(
                        renewed = report.renewed,
                        lost = report.lost,
                        failed = report.failed,
                        "renewal pass incomplete"
                    );
                } else if report.renewed > 0 {
                    debug!(renewed = report.renewed, "renewal pass");
                }
            }
        }
    }

    info!("renewal scheduler stopped");
}

/// Renew every registered lease once
pub(crate) async fn renew_all<S: LeaseStore>(
    store: &S,
    registry: &LockRegistry,
    config: &LockConfig,
) -> RenewalReport {
    let mut report = RenewalReport::default();

    for RegisteredLock {
        name,
        secret,
        generation,
    } in registry.snapshot()
    {
        // Released or re-locked since the snapshot
        if !registry.is_current(&name, generation) {
            continue;
        }

        match store.renew(&name, &secret, config.renew_ttl).await {
            Ok(true) => report.renewed += 1,
            Ok(false) => {
                report.lost += 1;
                // A re-lock during the renew call registers a new generation
                // and must survive this purge.
                if config.purge_lost && registry.remove_if_generation(&name, generation) {
                    warn!(name = %name, "lease lost, dropped from registry");
                } else {
                    warn!(name = %name, "lease lost");
                }
            }
            Err(e) => {
                // Transient: keep the entry so the next tick retries
                report.failed += 1;
                warn!(name = %name, error = %e, "renew lock failed");
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "renewal_tests.rs"]
mod tests;
