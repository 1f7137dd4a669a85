// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease TTL helpers

use std::time::Duration;

/// Convert a lease TTL to the whole seconds a store expiry takes.
///
/// Rounds up so a lease never lives shorter than requested, and never
/// returns zero (`SET .. EX 0` is rejected by Redis).
pub fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    let secs = if ttl.subsec_nanos() > 0 { secs + 1 } else { secs };
    secs.max(1)
}
