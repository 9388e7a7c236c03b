// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Eviction of abandoned sessions.
//!
//! A caller may `begin` a session and never complete or wait on it. The
//! sweeper periodically closes and removes every session that has not been
//! looked up for longer than `stale_after`, bounding memory to the sessions
//! that are actually in flight.

use crate::hub::{SessionHub, Shared};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

impl<T, E> Shared<T, E> {
    fn sweep_at(&self, now: Instant) -> usize {
        let stale_after = self.config.stale_after;
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, session| {
            if session.idle_for(now) > stale_after {
                session.close();
                false
            } else {
                true
            }
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = sessions.len(), "swept stale sessions");
        }
        evicted
    }
}

impl<T, E> SessionHub<T, E> {
    /// Evict sessions idle for longer than `stale_after` as of `now`.
    ///
    /// Returns the number of sessions evicted.
    pub fn sweep_at(&self, now: Instant) -> usize {
        self.shared.sweep_at(now)
    }

    /// Evict stale sessions as of the configured clock's current time.
    pub fn sweep(&self) -> usize {
        self.sweep_at(self.shared.config.clock.now())
    }

    /// Stop the sweeper started by [`new`](Self::new) and wait for it to exit.
    ///
    /// Returns false if this hub has no sweeper of its own (built with
    /// [`without_sweeper`](Self::without_sweeper), or already stopped).
    pub async fn stop_sweeper(&self) -> bool {
        let sweeper = self.shared.sweeper.lock().take();
        match sweeper {
            Some(sweeper) => {
                sweeper.stop().await;
                true
            }
            None => false,
        }
    }

    /// Whether the sweeper started by [`new`](Self::new) is still running
    pub fn has_sweeper(&self) -> bool {
        self.shared
            .sweeper
            .lock()
            .as_ref()
            .is_some_and(Sweeper::is_running)
    }
}

impl<T, E> SessionHub<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Spawn a background task that calls [`sweep`](Self::sweep) every
    /// `sweep_interval`.
    ///
    /// The task stops when the returned handle is stopped or dropped, or
    /// when the last clone of the hub is dropped. Must be called from within
    /// a tokio runtime.
    pub fn spawn_sweeper(&self) -> Sweeper {
        let shared = Arc::downgrade(&self.shared);
        let period = self.shared.config.sweep_interval.max(Duration::from_millis(1));
        let token = CancellationToken::new();

        let handle = tokio::spawn(run_sweeper(shared, period, token.clone()));
        tracing::debug!(?period, "session sweeper started");

        Sweeper {
            token,
            handle: Some(handle),
        }
    }
}

async fn run_sweeper<T, E>(shared: Weak<Shared<T, E>>, period: Duration, token: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; nothing can be stale yet.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let Some(hub) = shared.upgrade() else {
            break;
        };
        hub.sweep_at(hub.config.clock.now());
    }

    tracing::debug!("session sweeper stopped");
}

/// Handle to a running sweeper task
#[must_use = "dropping the Sweeper stops it"]
pub struct Sweeper {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Signal the task to stop and wait for it to exit.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
#[path = "sweeper_tests.rs"]
mod tests;
