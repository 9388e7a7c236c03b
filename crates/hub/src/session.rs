// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-correlation state: one outcome slot plus its completion flags.

use crate::error::HubError;
use crate::id::SessionId;
use crate::slot::Slot;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Flags {
    completed: bool,
    closed: bool,
}

/// A pending correlation owned by the hub.
///
/// `flags` serializes `complete` against `close`, so the slot is filled at
/// most once and shut exactly once whoever gets there first.
pub(crate) struct Session<T, E> {
    id: SessionId,
    last_active: Mutex<Instant>,
    flags: Mutex<Flags>,
    slot: Slot<Result<T, E>>,
}

impl<T, E> Session<T, E> {
    pub(crate) fn new(id: SessionId, now: Instant) -> Self {
        Self {
            id,
            last_active: Mutex::new(now),
            flags: Mutex::new(Flags::default()),
            slot: Slot::new(),
        }
    }

    pub(crate) fn id(&self) -> SessionId {
        self.id
    }

    pub(crate) fn slot(&self) -> &Slot<Result<T, E>> {
        &self.slot
    }

    pub(crate) fn touch(&self, now: Instant) {
        let mut last_active = self.last_active.lock();
        if now > *last_active {
            *last_active = now;
        }
    }

    pub(crate) fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.last_active.lock())
    }

    /// Shut the slot if nobody has. Returns whether this call did it.
    pub(crate) fn close(&self) -> bool {
        let mut flags = self.flags.lock();
        if flags.closed {
            return false;
        }
        flags.closed = true;
        self.slot.shut();
        true
    }

    /// Deliver the outcome and shut the slot behind it.
    pub(crate) fn complete(&self, outcome: Result<T, E>) -> Result<(), HubError> {
        let mut flags = self.flags.lock();
        if flags.closed {
            return Err(HubError::AlreadyClosed(self.id));
        }
        if flags.completed {
            return Err(HubError::AlreadyCompleted(self.id));
        }
        flags.completed = true;

        // Only `complete` fills and the flags above guard it, so the slot is
        // still empty and open here.
        if self.slot.fill(outcome).is_err() {
            flags.closed = true;
            self.slot.shut();
            return Err(HubError::AlreadyClosed(self.id));
        }

        flags.closed = true;
        self.slot.shut();
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.flags.lock().closed
    }

    #[cfg(test)]
    pub(crate) fn is_completed(&self) -> bool {
        self.flags.lock().completed
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
