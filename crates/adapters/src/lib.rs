// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Lease store adapters: the atomic acquire/renew/release operations a lock
//! manager runs against its backing store

pub mod lease;
pub mod traced;

pub use lease::{LeaseStore, RedisLeaseStore, StoreError};
pub use traced::TracedLeaseStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use lease::{FakeLeaseStore, StoreCall};
