// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of locks this process believes it holds
//!
//! Shared between callers (insert on acquire, remove on release) and the
//! renewal scheduler (snapshot every tick). The map is sharded, so callers
//! working on different names rarely contend, and a snapshot never holds a
//! shard lock while the scheduler talks to the store.
//!
//! Every insert stamps the entry with a fresh generation, including a
//! re-lock with the same secret. Removals made on behalf of an earlier
//! observation go through [`LockRegistry::remove_if_generation`] so they
//! cannot drop an entry registered after that observation.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// One held lock as seen at snapshot time
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RegisteredLock {
    pub name: String,
    pub secret: String,
    pub generation: u64,
}

#[derive(Debug)]
struct Held {
    secret: String,
    generation: u64,
}

/// Concurrent `name -> secret` map of held locks
#[derive(Debug, Default)]
pub struct LockRegistry {
    entries: DashMap<String, Held>,
    next_generation: AtomicU64,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as held with `secret`, replacing any previous entry.
    ///
    /// Returns the generation assigned to this registration.
    pub fn insert(&self, name: &str, secret: &str) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.entries.insert(
            name.to_string(),
            Held {
                secret: secret.to_string(),
                generation,
            },
        );
        generation
    }

    /// Forget `name` only if it is still registered with `secret`.
    ///
    /// Returns whether an entry was removed.
    pub fn remove_if_held_by(&self, name: &str, secret: &str) -> bool {
        self.entries
            .remove_if(name, |_, held| held.secret == secret)
            .is_some()
    }

    /// Forget `name` only if it has not been registered again since
    /// `generation` was handed out.
    pub fn remove_if_generation(&self, name: &str, generation: u64) -> bool {
        self.entries
            .remove_if(name, |_, held| held.generation == generation)
            .is_some()
    }

    /// Whether `name` is still the registration stamped `generation`
    pub fn is_current(&self, name: &str, generation: u64) -> bool {
        self.entries
            .get(name)
            .is_some_and(|held| held.generation == generation)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Copy of every entry, in no particular order
    pub fn snapshot(&self) -> Vec<RegisteredLock> {
        self.entries
            .iter()
            .map(|entry| RegisteredLock {
                name: entry.key().clone(),
                secret: entry.secret.clone(),
                generation: entry.generation,
            })
            .collect()
    }

    /// Names of every registered lock
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
