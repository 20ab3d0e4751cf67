/*!
 * Gate Configuration
 *
 * Runtime configuration for gate diagnostics and drain behavior
 */

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;

/// Environment variable overriding the drain check interval (milliseconds)
pub const DRAIN_CHECK_ENV: &str = "SYNC_GATE_DRAIN_CHECK_MS";

/// Default drain check interval
const DEFAULT_DRAIN_CHECK: Duration = Duration::from_millis(100);

/// Shortest drain check interval a gate will use
pub const MIN_DRAIN_CHECK_INTERVAL: Duration = Duration::from_millis(1);

/// Gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Name attached to every diagnostic line emitted by the gate
    pub label: Cow<'static, str>,
    /// Upper bound for each blocking step of `blocking_disable`
    ///
    /// After every interval the drainer wakes all waiters again and reports
    /// how many are still inside `wait`. Values below
    /// `MIN_DRAIN_CHECK_INTERVAL` are raised to it when used.
    pub drain_check_interval: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("gate"),
            drain_check_interval: DEFAULT_DRAIN_CHECK,
        }
    }
}

impl GateConfig {
    /// Default configuration with a custom label
    pub fn named(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Configuration for owners that tear gates down often
    pub const fn responsive() -> Self {
        Self {
            label: Cow::Borrowed("gate"),
            drain_check_interval: Duration::from_millis(10),
        }
    }

    /// Build from environment, falling back to defaults
    ///
    /// Environment variables:
    /// - SYNC_GATE_DRAIN_CHECK_MS: drain check interval in milliseconds
    pub fn from_env() -> Self {
        let drain_check_interval = std::env::var(DRAIN_CHECK_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|ms| Duration::from_millis(ms).max(MIN_DRAIN_CHECK_INTERVAL))
            .unwrap_or(DEFAULT_DRAIN_CHECK);

        Self {
            drain_check_interval,
            ..Self::default()
        }
    }

    /// Replace the label
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    /// Replace the drain check interval
    pub fn with_drain_check_interval(mut self, interval: Duration) -> Self {
        self.drain_check_interval = interval.max(MIN_DRAIN_CHECK_INTERVAL);
        self
    }

    /// Drain check interval with the floor applied
    ///
    /// The field is public and deserializable, so it can hold anything; the
    /// gate only ever reads it through here.
    #[inline]
    pub fn effective_drain_check_interval(&self) -> Duration {
        self.drain_check_interval.max(MIN_DRAIN_CHECK_INTERVAL)
    }
}
