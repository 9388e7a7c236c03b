// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-item handoff that can be shut exactly once.
//!
//! A slot moves through `empty -> filled -> shut` or `empty -> shut`. A value
//! stored before shutdown stays receivable after it; once that value is taken
//! (by whichever receiver gets there first) every other receiver sees the
//! slot as shut.

use parking_lot::Mutex;
use tokio::sync::Notify;

/// Result of a non-suspending receive
#[derive(Debug, PartialEq, Eq)]
pub enum TryRecv<V> {
    Value(V),
    Shut,
    Empty,
}

struct State<V> {
    value: Option<V>,
    shut: bool,
}

/// Capacity-one, close-once channel
pub struct Slot<V> {
    state: Mutex<State<V>>,
    notify: Notify,
}

impl<V> Slot<V> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                value: None,
                shut: false,
            }),
            notify: Notify::new(),
        }
    }

    /// Store `value` unless the slot is full or shut, in which case it is
    /// handed back.
    pub fn fill(&self, value: V) -> Result<(), V> {
        {
            let mut state = self.state.lock();
            if state.shut || state.value.is_some() {
                return Err(value);
            }
            state.value = Some(value);
        }
        self.notify.notify_waiters();
        Ok(())
    }

    /// Shut the slot. Returns false if it was already shut.
    pub fn shut(&self) -> bool {
        {
            let mut state = self.state.lock();
            if state.shut {
                return false;
            }
            state.shut = true;
        }
        self.notify.notify_waiters();
        true
    }

    pub fn is_shut(&self) -> bool {
        self.state.lock().shut
    }

    pub fn try_recv(&self) -> TryRecv<V> {
        let mut state = self.state.lock();
        match state.value.take() {
            Some(value) => TryRecv::Value(value),
            None if state.shut => TryRecv::Shut,
            None => TryRecv::Empty,
        }
    }

    /// Wait for a value. Returns `None` once the slot is shut with nothing
    /// left to take.
    pub async fn recv(&self) -> Option<V> {
        loop {
            // Register interest before checking state so a fill or shut that
            // lands in between still wakes us.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            match self.try_recv() {
                TryRecv::Value(value) => return Some(value),
                TryRecv::Shut => return None,
                TryRecv::Empty => {}
            }

            notified.await;
        }
    }
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "slot_tests.rs"]
mod tests;
