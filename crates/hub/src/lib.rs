// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sessionhub: turn callback-driven request/reply exchanges into a single
//! cancellable `wait`.
//!
//! ```ignore
//! // Starts the eviction sweeper; it stops when the last clone drops
//! let hub: SessionHub<Reply, PeerError> = SessionHub::new(HubConfig::default());
//!
//! let id = hub.begin();
//! if send_request(id, payload).await.is_err() {
//!     hub.close(id);
//! }
//! let reply = hub.wait_timeout(id, Duration::from_secs(5)).await?;
//!
//! // elsewhere, when the peer answers:
//! hub.complete(id, Ok(reply))?;
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod hub;
pub mod id;
mod session;
pub mod slot;
pub mod sweeper;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::HubConfig;
pub use error::{Cancellation, ConfigError, HubError};
pub use hub::SessionHub;
pub use id::{IdGen, RandomIdGen, SequentialIdGen, SessionId};
pub use sweeper::Sweeper;
