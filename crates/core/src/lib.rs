// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! redlease-core: shared building blocks for the redlease lock engine
//!
//! This crate provides:
//! - Clock abstractions so lease expiry can be driven by fake or paused time
//! - Lock and store configuration loaded from TOML
//! - Lease TTL helpers shared by every store implementation

pub mod clock;
pub mod config;
pub mod lease;

// Re-exports
pub use clock::{Clock, SystemClock, TokioClock};
#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use config::{Config, ConfigError, LockConfig, StoreConfig};
pub use lease::ttl_seconds;
