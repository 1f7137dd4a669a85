// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock and store configuration
//!
//! Loaded from TOML with `[lock]` and `[store]` tables. Durations use
//! humantime syntax (`"10s"`, `"500ms"`). Every field has a default, so an
//! empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides [`StoreConfig::url`]
pub const STORE_URL_ENV: &str = "REDLEASE_STORE_URL";

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("renew_interval ({interval:?}) must be shorter than {field} ({ttl:?})")]
    IntervalTooLong {
        interval: Duration,
        field: &'static str,
        ttl: Duration,
    },
    #[error("check_key must not be empty")]
    EmptyCheckKey,
}

/// Lease timing and renewal policy for a lock manager
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Lease granted by `lock` when the caller gives no TTL
    #[serde(with = "humantime_serde")]
    pub acquire_ttl: Duration,
    /// Lease every renewal re-arms to, whatever the acquisition TTL was
    #[serde(with = "humantime_serde")]
    pub renew_ttl: Duration,
    /// How often the renewal scheduler ticks
    #[serde(with = "humantime_serde")]
    pub renew_interval: Duration,
    /// Key used to check the store at startup
    pub check_key: String,
    /// Drop a registry entry once a renewal reports it is owned by someone else
    pub purge_lost: bool,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            acquire_ttl: Duration::from_secs(10),
            renew_ttl: Duration::from_secs(5),
            renew_interval: Duration::from_secs(1),
            check_key: "redlease:health".to_string(),
            purge_lost: true,
        }
    }
}

impl LockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_acquire_ttl(mut self, ttl: Duration) -> Self {
        self.acquire_ttl = ttl;
        self
    }

    pub fn with_renew_ttl(mut self, ttl: Duration) -> Self {
        self.renew_ttl = ttl;
        self
    }

    pub fn with_renew_interval(mut self, interval: Duration) -> Self {
        self.renew_interval = interval;
        self
    }

    pub fn with_check_key(mut self, key: impl Into<String>) -> Self {
        self.check_key = key.into();
        self
    }

    pub fn with_purge_lost(mut self, purge: bool) -> Self {
        self.purge_lost = purge;
        self
    }

    /// Check that renewals can keep every lease alive.
    ///
    /// The scheduler must tick more often than the shortest lease it
    /// maintains: the acquisition TTL before the first renewal, the renewal
    /// TTL afterwards.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("acquire_ttl", self.acquire_ttl),
            ("renew_ttl", self.renew_ttl),
            ("renew_interval", self.renew_interval),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration(field));
            }
        }

        for (field, ttl) in [
            ("acquire_ttl", self.acquire_ttl),
            ("renew_ttl", self.renew_ttl),
        ] {
            if self.renew_interval >= ttl {
                return Err(ConfigError::IntervalTooLong {
                    interval: self.renew_interval,
                    field,
                    ttl,
                });
            }
        }

        if self.check_key.is_empty() {
            return Err(ConfigError::EmptyCheckKey);
        }

        Ok(())
    }
}

/// Connection settings for the backing store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Redis connection URL
    pub url: String,
    /// Upper bound on a single store round trip
    #[serde(with = "humantime_serde")]
    pub op_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/".to_string(),
            op_timeout: Duration::from_secs(3),
        }
    }
}

/// Top-level configuration file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lock: LockConfig,
    pub store: StoreConfig,
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(source)?;
        config.lock.validate()?;
        Ok(config)
    }

    /// Load a config file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&source)?;
        Ok(config.with_store_url_override(std::env::var(STORE_URL_ENV).ok()))
    }

    /// Replace the store URL when an override is present and non-empty
    pub fn with_store_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.store.url = url;
        }
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
