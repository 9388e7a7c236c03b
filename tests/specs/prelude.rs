//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use sessionhub::{HubConfig, SessionHub};
use std::time::Duration;

/// Base time unit for scenario timings
pub const UNIT: Duration = Duration::from_millis(100);

/// Hub carrying string values and string errors, default configuration.
/// Starts its own sweeper, so call from within a tokio runtime.
pub fn hub() -> SessionHub<String, String> {
    SessionHub::new(HubConfig::default())
}

/// Hub with a short stale window and sweep interval, in multiples of [`UNIT`].
pub fn sweeping_hub(stale_units: u32, interval_units: u32) -> SessionHub<String, String> {
    SessionHub::new(
        HubConfig::default()
            .with_stale_after(UNIT * stale_units)
            .with_sweep_interval(UNIT * interval_units),
    )
}
