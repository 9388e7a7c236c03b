// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hub construction settings.
//!
//! A [`HubConfig`] is fixed once the hub is built. Durations can come from
//! code, from `SESSIONHUB_*` environment variables, or from a TOML snippet:
//!
//! ```toml
//! stale_after_secs = 120
//! sweep_interval_secs = 30
//! ```

use crate::clock::{Clock, SystemClock};
use crate::error::ConfigError;
use crate::id::{IdGen, SequentialIdGen};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default inactivity window before a session is evicted (60 seconds).
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60);

/// Default period between sweeps (60 seconds).
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub const STALE_AFTER_ENV: &str = "SESSIONHUB_STALE_AFTER_SECS";
pub const SWEEP_INTERVAL_ENV: &str = "SESSIONHUB_SWEEP_INTERVAL_SECS";

/// Settings for a [`SessionHub`](crate::SessionHub).
///
/// `stale_after` must exceed the longest deadline any caller passes to
/// `wait`, otherwise sessions can be evicted while still awaited.
#[derive(Clone)]
pub struct HubConfig {
    pub stale_after: Duration,
    pub sweep_interval: Duration,
    pub id_gen: Arc<dyn IdGen>,
    pub clock: Arc<dyn Clock>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            stale_after: DEFAULT_STALE_AFTER,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            id_gen: Arc::new(SequentialIdGen::new()),
            clock: Arc::new(SystemClock),
        }
    }
}

impl fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubConfig")
            .field("stale_after", &self.stale_after)
            .field("sweep_interval", &self.sweep_interval)
            .finish_non_exhaustive()
    }
}

/// File representation of the duration settings
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Settings {
    stale_after_secs: Option<u64>,
    sweep_interval_secs: Option<u64>,
}

impl HubConfig {
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    pub fn with_id_gen(mut self, id_gen: impl IdGen + 'static) -> Self {
        self.id_gen = Arc::new(id_gen);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Defaults overlaid with `SESSIONHUB_STALE_AFTER_SECS` and
    /// `SESSIONHUB_SWEEP_INTERVAL_SECS` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay_vars(|var| std::env::var(var).ok())
    }

    /// Defaults overlaid with the durations found in a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(secs) = settings.stale_after_secs {
            config.stale_after = Duration::from_secs(secs);
        }
        if let Some(secs) = settings.sweep_interval_secs {
            config.sweep_interval = Duration::from_secs(secs);
        }
        config.validate()
    }

    fn overlay_vars(
        mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(secs) = parse_secs(STALE_AFTER_ENV, lookup(STALE_AFTER_ENV))? {
            self.stale_after = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_secs(SWEEP_INTERVAL_ENV, lookup(SWEEP_INTERVAL_ENV))? {
            self.sweep_interval = Duration::from_secs(secs);
        }
        self.validate()
    }

    /// Reject zero durations.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.stale_after.is_zero() {
            return Err(ConfigError::ZeroInterval("stale_after"));
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("sweep_interval"));
        }
        Ok(self)
    }
}

fn parse_secs(var: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
