// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis lease store
//!
//! Each operation is a Lua script, so the read of the current holder and the
//! conditional write happen in one server-side evaluation. Scripts are sent by
//! hash (`EVALSHA`) and loaded on demand when the server reports `NOSCRIPT`.

use super::{LeaseStore, StoreError};
use ::redis::aio::ConnectionManager;
use ::redis::{RedisError, Script, ScriptInvocation};
use async_trait::async_trait;
use redlease_core::{ttl_seconds, StoreConfig};
use std::sync::Arc;
use std::time::Duration;

/// Set the key when it is free or already ours.
const ACQUIRE_SCRIPT: &str = r#"
local v = redis.call("GET", KEYS[1])
if v == false or v == ARGV[1] then
    return redis.call("SET", KEYS[1], ARGV[1], "EX", ARGV[2]) and 1
else
    return 0
end
"#;

/// Re-arm the expiry only while the key holds our secret.
const RENEW_SCRIPT: &str = r#"
local v = redis.call("GET", KEYS[1])
if v == ARGV[1] then
    return redis.call("SET", KEYS[1], ARGV[1], "EX", ARGV[2]) and 1
else
    return 0
end
"#;

/// Delete the key if ours; an absent key is already released.
const RELEASE_SCRIPT: &str = r#"
local v = redis.call("GET", KEYS[1])
if v == false then
    return 1
elseif v == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

struct LeaseScripts {
    acquire: Script,
    renew: Script,
    release: Script,
}

impl LeaseScripts {
    fn new() -> Self {
        Self {
            acquire: Script::new(ACQUIRE_SCRIPT),
            renew: Script::new(RENEW_SCRIPT),
            release: Script::new(RELEASE_SCRIPT),
        }
    }
}

/// Lease store backed by a single Redis server
#[derive(Clone)]
pub struct RedisLeaseStore {
    conn: ConnectionManager,
    scripts: Arc<LeaseScripts>,
    op_timeout: Duration,
}

impl RedisLeaseStore {
    /// Wrap an existing connection
    pub fn new(conn: ConnectionManager, op_timeout: Duration) -> Self {
        Self {
            conn,
            scripts: Arc::new(LeaseScripts::new()),
            op_timeout,
        }
    }

    /// Open a managed connection to the configured server
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = ::redis::Client::open(config.url.as_str()).map_err(unavailable)?;
        let conn = tokio::time::timeout(config.op_timeout, client.get_connection_manager())
            .await
            .map_err(|_| StoreError::Timeout {
                op: "connect",
                after: config.op_timeout,
            })?
            .map_err(unavailable)?;
        tracing::debug!(url = %config.url, "connected to lease store");
        Ok(Self::new(conn, config.op_timeout))
    }

    async fn run(
        &self,
        op: &'static str,
        invocation: &ScriptInvocation<'_>,
    ) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let reply: i64 = tokio::time::timeout(self.op_timeout, invocation.invoke_async(&mut conn))
            .await
            .map_err(|_| StoreError::Timeout {
                op,
                after: self.op_timeout,
            })?
            .map_err(unavailable)?;
        reply_to_bool(op, reply)
    }
}

#[async_trait]
impl LeaseStore for RedisLeaseStore {
    async fn acquire(&self, key: &str, secret: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut invocation = self.scripts.acquire.key(key);
        invocation.arg(secret).arg(ttl_seconds(ttl));
        self.run("acquire", &invocation).await
    }

    async fn renew(&self, key: &str, secret: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut invocation = self.scripts.renew.key(key);
        invocation.arg(secret).arg(ttl_seconds(ttl));
        self.run("renew", &invocation).await
    }

    async fn release(&self, key: &str, secret: &str) -> Result<bool, StoreError> {
        let mut invocation = self.scripts.release.key(key);
        invocation.arg(secret);
        self.run("release", &invocation).await
    }
}

fn unavailable(e: RedisError) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

/// Scripts answer 1 (done) or 0 (held by another secret); anything else is a
/// protocol violation rather than a lost lease.
fn reply_to_bool(op: &'static str, reply: i64) -> Result<bool, StoreError> {
    match reply {
        1 => Ok(true),
        0 => Ok(false),
        reply => Err(StoreError::UnexpectedReply { op, reply }),
    }
}

#[cfg(test)]
#[path = "redis_tests.rs"]
mod tests;
