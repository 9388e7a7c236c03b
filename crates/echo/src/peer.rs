// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated remote peer and the client that talks to it.
//!
//! Requests carry a session id across an in-process "network" (a pair of
//! channels). Replies come back on a separate channel and are routed to the
//! waiting caller through the hub.

use sessionhub::{HubError, SessionHub, SessionId};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Outbound message carrying the correlation id
#[derive(Debug, Clone)]
pub struct Request {
    pub session: SessionId,
    pub payload: String,
}

/// Inbound message answering a [`Request`]
#[derive(Debug, Clone)]
pub struct Reply {
    pub session: SessionId,
    pub body: Result<String, PeerError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerError {
    #[error("peer rejected an empty payload")]
    EmptyPayload,
}

/// Errors from a single request/reply exchange
#[derive(Debug, Error)]
pub enum CallError {
    #[error("peer is not accepting requests")]
    Disconnected,
    #[error(transparent)]
    Hub(#[from] HubError),
    #[error(transparent)]
    Peer(#[from] PeerError),
}

pub type EchoHub = SessionHub<String, PeerError>;

/// Spawn a peer that answers each request after `delay`.
///
/// Returns the request sender and the reply receiver. The peer stops once
/// every request sender is dropped.
pub fn spawn_peer(delay: Duration) -> (mpsc::Sender<Request>, mpsc::Receiver<Reply>) {
    let (request_tx, mut request_rx) = mpsc::channel::<Request>(64);
    let (reply_tx, reply_rx) = mpsc::channel::<Reply>(64);

    tokio::spawn(async move {
        while let Some(request) = request_rx.recv().await {
            let reply_tx = reply_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let body = if request.payload.is_empty() {
                    Err(PeerError::EmptyPayload)
                } else {
                    Ok(request.payload.to_uppercase())
                };
                let _ = reply_tx
                    .send(Reply {
                        session: request.session,
                        body,
                    })
                    .await;
            });
        }
        tracing::debug!("peer stopped");
    });

    (request_tx, reply_rx)
}

/// Feed every reply into the hub until the reply channel closes.
pub fn spawn_reply_router(hub: EchoHub, mut replies: mpsc::Receiver<Reply>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(reply) = replies.recv().await {
            if let Err(e) = hub.complete(reply.session, reply.body) {
                // The caller gave up or the session was swept
                tracing::debug!(session = %reply.session, error = %e, "reply dropped");
            }
        }
    })
}

/// Issues requests and waits for their replies.
#[derive(Clone)]
pub struct EchoClient {
    hub: EchoHub,
    requests: mpsc::Sender<Request>,
    timeout: Duration,
}

impl EchoClient {
    pub fn new(hub: EchoHub, requests: mpsc::Sender<Request>, timeout: Duration) -> Self {
        Self {
            hub,
            requests,
            timeout,
        }
    }

    pub async fn call(&self, payload: impl Into<String>) -> Result<String, CallError> {
        let session = self.hub.begin();
        let request = Request {
            session,
            payload: payload.into(),
        };

        if self.requests.send(request).await.is_err() {
            // No reply can ever come for this session
            self.hub.close(session);
            return Err(CallError::Disconnected);
        }

        let body = self.hub.wait_timeout(session, self.timeout).await?;
        Ok(body?)
    }
}

#[cfg(test)]
#[path = "peer_tests.rs"]
mod tests;
