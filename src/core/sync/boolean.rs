/*!
 * Boolean Gate
 *
 * Level-triggered open/closed signal, usable as a one-shot or reusable barrier.
 * Closing changes the level; it does not disable the gate.
 */

use super::config::GateConfig;
use super::gate::GatedValue;
use super::outcome::WaitOutcome;
use super::traits::LogSink;
use std::sync::Arc;
use std::time::Duration;

/// Open/closed signal that threads can wait on
#[derive(Debug, Default)]
pub struct BooleanGate {
    gate: GatedValue<bool>,
}

impl BooleanGate {
    /// Create a gate; `open = true` lets the first `wait` through at once
    pub fn new(enabled: bool, open: bool) -> Self {
        Self {
            gate: GatedValue::new(enabled, open),
        }
    }

    pub fn with_config(enabled: bool, open: bool, config: GateConfig) -> Self {
        Self {
            gate: GatedValue::with_config(enabled, open, config),
        }
    }

    pub fn with_sink(self, sink: Arc<dyn LogSink>) -> Self {
        Self {
            gate: self.gate.with_sink(sink),
        }
    }

    #[inline]
    pub fn as_gate(&self) -> &GatedValue<bool> {
        &self.gate
    }

    /// Open the gate and wake every waiter
    pub fn open(&self) {
        self.gate.set_value(true);
    }

    /// Close the gate; later waits block until the next `open`
    pub fn close(&self) {
        self.gate.set_value(false);
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.gate.value()
    }

    /// Block while closed
    ///
    /// `ConditionMet` once open, `Disabled` if the gate is disabled first,
    /// `Timeout` on expiry.
    pub fn wait(&self, timeout: Option<Duration>) -> WaitOutcome {
        self.gate.wait(|open| *open, timeout)
    }

    #[inline]
    pub fn enable(&self) {
        self.gate.enable();
    }

    #[inline]
    pub fn disable(&self) {
        self.gate.disable();
    }

    /// See [`GatedValue::blocking_disable`]. Blocks the caller.
    #[inline]
    pub fn blocking_disable(&self) {
        self.gate.blocking_disable();
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.gate.is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_open_gate_does_not_block() {
        let gate = BooleanGate::new(true, true);
        assert_eq!(gate.wait(None), WaitOutcome::ConditionMet);
    }

    #[test]
    fn test_close_is_not_disable() {
        let gate = BooleanGate::new(true, true);
        gate.close();
        assert!(gate.is_enabled());
        assert!(!gate.is_open());
        assert_eq!(gate.wait(Some(Duration::from_millis(20))), WaitOutcome::Timeout);
    }

    #[test]
    fn test_reusable_barrier() {
        let gate = BooleanGate::default();
        for _ in 0..3 {
            thread::scope(|s| {
                let waiter = s.spawn(|| gate.wait(Some(Duration::from_secs(5))));
                thread::sleep(Duration::from_millis(10));
                gate.open();
                assert_eq!(waiter.join().unwrap(), WaitOutcome::ConditionMet);
            });
            gate.close();
        }
    }

    #[test]
    fn test_disable_releases_closed_waiters() {
        let gate = BooleanGate::new(true, false);
        let start = Instant::now();
        thread::scope(|s| {
            let waiter = s.spawn(|| gate.wait(None));
            thread::sleep(Duration::from_millis(20));
            gate.disable();
            assert_eq!(waiter.join().unwrap(), WaitOutcome::Disabled);
        });
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
