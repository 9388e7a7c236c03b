// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session registry.
//!
//! A producer calls [`SessionHub::begin`], ships the id through whatever
//! asynchronous channel it uses, and eventually calls
//! [`SessionHub::complete`]. A consumer calls [`SessionHub::wait`] with the
//! same id and suspends until the outcome arrives or its cancellation fires.
//!
//! The first `wait` to return always removes the session, whatever the
//! reason it returned. A session is therefore waited on at most once; a
//! producer that completes after the waiter gave up gets `AlreadyClosed` or
//! `SessionNotFound` back instead of having its value buffered.

use crate::config::HubConfig;
use crate::error::{Cancellation, HubError};
use crate::id::SessionId;
use crate::session::Session;
use crate::sweeper::Sweeper;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// State shared by every clone of a hub and its sweeper task
pub(crate) struct Shared<T, E> {
    pub(crate) sessions: Mutex<HashMap<SessionId, Arc<Session<T, E>>>>,
    pub(crate) config: HubConfig,
    /// Sweeper started by [`SessionHub::new`]; stops when the last clone drops
    pub(crate) sweeper: Mutex<Option<Sweeper>>,
}

impl<T, E> Shared<T, E> {
    /// Look up a live session, refreshing its activity time.
    fn lookup(&self, id: SessionId) -> Option<Arc<Session<T, E>>> {
        let now = self.config.clock.now();
        let sessions = self.sessions.lock();
        let session = sessions.get(&id)?;
        session.touch(now);
        Some(Arc::clone(session))
    }

    /// Remove `session` from the map if it is still the entry for its id,
    /// then close it.
    fn release(&self, session: &Arc<Session<T, E>>) {
        let mut sessions = self.sessions.lock();
        let id = session.id();
        if sessions
            .get(&id)
            .is_some_and(|current| Arc::ptr_eq(current, session))
        {
            sessions.remove(&id);
        }
        session.close();
    }
}

/// Registry correlating `complete` calls with `wait` calls by session id.
///
/// `T` is the value a producer delivers and `E` the error it may deliver
/// instead. Clones share the same registry.
pub struct SessionHub<T, E> {
    pub(crate) shared: Arc<Shared<T, E>>,
}

impl<T, E> Clone for SessionHub<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> Default for SessionHub<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

impl<T, E> fmt::Debug for SessionHub<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHub")
            .field("sessions", &self.len())
            .field("config", &self.shared.config)
            .finish()
    }
}

/// Releases the session when a wait returns or its future is dropped
struct ReleaseOnExit<'a, T, E> {
    shared: &'a Shared<T, E>,
    session: &'a Arc<Session<T, E>>,
}

impl<T, E> Drop for ReleaseOnExit<'_, T, E> {
    fn drop(&mut self) {
        self.shared.release(self.session);
        tracing::trace!(session = %self.session.id(), "wait finished, session released");
    }
}

impl<T, E> SessionHub<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Create a hub and start its sweeper.
    ///
    /// The sweeper runs until [`stop_sweeper`](Self::stop_sweeper) is called
    /// or the last clone of the hub is dropped. Must be called from within a
    /// tokio runtime.
    pub fn new(config: HubConfig) -> Self {
        let hub = Self::without_sweeper(config);
        let sweeper = hub.spawn_sweeper();
        *hub.shared.sweeper.lock() = Some(sweeper);
        hub
    }
}

impl<T, E> SessionHub<T, E> {
    /// Create a hub that never evicts on its own.
    ///
    /// Stale sessions are only reclaimed by calling [`sweep`](Self::sweep)
    /// or by a sweeper from [`spawn_sweeper`](Self::spawn_sweeper). Needs no
    /// runtime.
    pub fn without_sweeper(config: HubConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                sessions: Mutex::new(HashMap::new()),
                config,
                sweeper: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.shared.config
    }

    /// Open a session and return its id.
    pub fn begin(&self) -> SessionId {
        let id = self.shared.config.id_gen.next_id();
        let session = Arc::new(Session::new(id, self.shared.config.clock.now()));
        self.shared.sessions.lock().insert(id, session);
        tracing::trace!(session = %id, "session begun");
        id
    }

    /// Deliver the outcome for `id`.
    ///
    /// Fails with `SessionNotFound` if the session is gone (never begun,
    /// already waited on, closed, or evicted) and with `AlreadyClosed` or
    /// `AlreadyCompleted` if it can no longer accept an outcome. The session
    /// stays registered until its waiter, `close`, or the sweeper removes it.
    pub fn complete(&self, id: SessionId, outcome: Result<T, E>) -> Result<(), HubError> {
        let session = self
            .shared
            .lookup(id)
            .ok_or(HubError::SessionNotFound(id))?;
        session.complete(outcome)?;
        tracing::trace!(session = %id, "session completed");
        Ok(())
    }

    /// Wait for the outcome of `id`, giving up when `cancel` resolves.
    ///
    /// Returns the producer's outcome as passed to `complete`. If another
    /// waiter took the outcome, or the session was closed or evicted, this
    /// returns `SessionClosed`. If `cancel` finishes first the error carries
    /// its [`Cancellation`] reason. An outcome that is already available wins
    /// over a cancellation that is ready at the same time.
    ///
    /// On every exit, including the returned future being dropped, the
    /// session is removed from the hub and closed.
    pub async fn wait<C>(&self, id: SessionId, cancel: C) -> Result<Result<T, E>, HubError>
    where
        C: Future<Output = Cancellation>,
    {
        let session = self
            .shared
            .lookup(id)
            .ok_or(HubError::SessionNotFound(id))?;
        let _release = ReleaseOnExit {
            shared: &self.shared,
            session: &session,
        };

        tokio::select! {
            biased;
            received = session.slot().recv() => received.ok_or(HubError::SessionClosed(id)),
            reason = cancel => Err(HubError::Cancelled { id, reason }),
        }
    }

    /// Wait for at most `timeout`, failing with `DeadlineExceeded`.
    pub async fn wait_timeout(
        &self,
        id: SessionId,
        timeout: Duration,
    ) -> Result<Result<T, E>, HubError> {
        self.wait(id, async move {
            tokio::time::sleep(timeout).await;
            Cancellation::DeadlineExceeded
        })
        .await
    }

    /// Wait until `deadline`, failing with `DeadlineExceeded`.
    pub async fn wait_until(
        &self,
        id: SessionId,
        deadline: tokio::time::Instant,
    ) -> Result<Result<T, E>, HubError> {
        self.wait(id, async move {
            tokio::time::sleep_until(deadline).await;
            Cancellation::DeadlineExceeded
        })
        .await
    }

    /// Wait until `token` is cancelled, failing with `Cancelled`.
    pub async fn wait_with_token(
        &self,
        id: SessionId,
        token: &CancellationToken,
    ) -> Result<Result<T, E>, HubError> {
        self.wait(id, async move {
            token.cancelled().await;
            Cancellation::Cancelled
        })
        .await
    }

    /// Abandon `id`: remove it and close it.
    ///
    /// Use this when no outcome will ever come, e.g. the request carrying
    /// the id could not be sent. Returns false if the session was already
    /// gone; that is not an error.
    pub fn close(&self, id: SessionId) -> bool {
        let mut sessions = self.shared.sessions.lock();
        match sessions.remove(&id) {
            Some(session) => {
                session.close();
                tracing::trace!(session = %id, "session closed");
                true
            }
            None => false,
        }
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.shared.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.shared.sessions.lock().contains_key(&id)
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
