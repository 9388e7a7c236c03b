// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identifiers and their generators

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one correlation between a `complete` and a `wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SessionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Generates unique session identifiers.
///
/// The hub performs no collision detection: an implementation must never
/// hand out an id that is still live in the same hub.
pub trait IdGen: Send + Sync {
    fn next_id(&self) -> SessionId;
}

/// Process-local counter, starting at 1.
#[derive(Clone, Default)]
pub struct SequentialIdGen {
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting after `last`, so the first id handed out is `last + 1`.
    pub fn starting_after(last: u64) -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(last)),
        }
    }
}

impl IdGen for SequentialIdGen {
    fn next_id(&self) -> SessionId {
        SessionId(self.counter.fetch_add(1, Ordering::SeqCst).wrapping_add(1))
    }
}

/// Random 64-bit ids for hubs whose ids travel between processes.
///
/// Uniqueness is probabilistic. Zero is never produced.
#[derive(Clone, Copy, Default)]
pub struct RandomIdGen;

impl IdGen for RandomIdGen {
    fn next_id(&self) -> SessionId {
        loop {
            let id: u64 = rand::random();
            if id != 0 {
                return SessionId(id);
            }
        }
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
