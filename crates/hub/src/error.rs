// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the session hub

use crate::SessionId;
use std::fmt;
use thiserror::Error;

/// Why a wait gave up before its session resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancellation {
    /// The caller cancelled explicitly
    Cancelled,
    /// The caller's deadline passed
    DeadlineExceeded,
}

impl fmt::Display for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cancellation::Cancelled => write!(f, "cancelled"),
            Cancellation::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Errors returned by hub operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("session {0} does not exist or was already cleared")]
    SessionNotFound(SessionId),
    #[error("session {0} closed before a value was received")]
    SessionClosed(SessionId),
    #[error("session {0} has already completed")]
    AlreadyCompleted(SessionId),
    #[error("session {0} has already closed")]
    AlreadyClosed(SessionId),
    #[error("wait on session {id} gave up: {reason}")]
    Cancelled { id: SessionId, reason: Cancellation },
}

impl HubError {
    /// The session this error refers to.
    pub fn session_id(&self) -> SessionId {
        match self {
            HubError::SessionNotFound(id)
            | HubError::SessionClosed(id)
            | HubError::AlreadyCompleted(id)
            | HubError::AlreadyClosed(id)
            | HubError::Cancelled { id, .. } => *id,
        }
    }

    /// Returns the cancellation reason if the wait was cancelled.
    pub fn cancellation(&self) -> Option<Cancellation> {
        match self {
            HubError::Cancelled { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Errors building a [`HubConfig`](crate::HubConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}
