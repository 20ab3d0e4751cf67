/*!
 * Synchronization Traits
 *
 * Seam between gates and whatever logging backend the host uses.
 *
 * # Design: Injected Sink Over Direct Backend Calls
 *
 * Gates only ever talk to a `LogSink`. The default forwards to `tracing`,
 * hosts still on the `log` facade can swap in `LogCrateSink`, and tests can
 * capture lines with their own implementation.
 */

use tracing::Level;

/// Target used for every diagnostic emitted by the gates
pub const LOG_TARGET: &str = "sync_gate";

/// Receiver for gate diagnostic lines
///
/// Implementations must be:
/// - **Thread-safe**: called from any thread touching the gate
/// - **Reentrant**: called with the gate lock released, so reading the
///   gate from inside `log` is allowed
pub trait LogSink: Send + Sync {
    /// Emit one diagnostic line
    fn log(&self, level: Level, message: &str);

    /// Whether lines at `level` would be kept
    ///
    /// Lets gates skip formatting lines nobody will read.
    fn enabled(&self, level: Level) -> bool {
        let _ = level;
        true
    }
}

/// Forwards to `tracing` events (default sink)
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: LOG_TARGET, "{}", message),
            Level::WARN => tracing::warn!(target: LOG_TARGET, "{}", message),
            Level::INFO => tracing::info!(target: LOG_TARGET, "{}", message),
            Level::DEBUG => tracing::debug!(target: LOG_TARGET, "{}", message),
            _ => tracing::trace!(target: LOG_TARGET, "{}", message),
        }
    }

    fn enabled(&self, level: Level) -> bool {
        match level {
            Level::ERROR => tracing::enabled!(target: LOG_TARGET, Level::ERROR),
            Level::WARN => tracing::enabled!(target: LOG_TARGET, Level::WARN),
            Level::INFO => tracing::enabled!(target: LOG_TARGET, Level::INFO),
            Level::DEBUG => tracing::enabled!(target: LOG_TARGET, Level::DEBUG),
            _ => tracing::enabled!(target: LOG_TARGET, Level::TRACE),
        }
    }
}

/// Forwards to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateSink;

impl LogCrateSink {
    fn convert(level: Level) -> log::Level {
        match level {
            Level::ERROR => log::Level::Error,
            Level::WARN => log::Level::Warn,
            Level::INFO => log::Level::Info,
            Level::DEBUG => log::Level::Debug,
            _ => log::Level::Trace,
        }
    }
}

impl LogSink for LogCrateSink {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, Self::convert(level), "{}", message);
    }

    fn enabled(&self, level: Level) -> bool {
        log::log_enabled!(target: LOG_TARGET, Self::convert(level))
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    #[inline(always)]
    fn log(&self, _level: Level, _message: &str) {}

    #[inline(always)]
    fn enabled(&self, _level: Level) -> bool {
        false
    }
}
