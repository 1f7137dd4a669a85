// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Lease lock engine: acquire, auto-renew, and release named locks held in a
//! shared store

mod error;
mod manager;
mod registry;
mod renewal;

pub use error::{LockError, StartupError};
pub use manager::LockManager;
pub use registry::{LockRegistry, RegisteredLock};
pub use renewal::{RenewalReport, RenewalScheduler};
