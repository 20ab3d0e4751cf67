/*!
 * Counter Gate
 *
 * Integer gate with increment/decrement and comparison waits.
 *
 * # Overflow Policy
 *
 * The counter is a plain `i64`: going negative is valid. Arithmetic
 * saturates at `i64::MIN`/`i64::MAX` and reports the clamp as a warning.
 */

use super::config::GateConfig;
use super::gate::GatedValue;
use super::outcome::WaitOutcome;
use super::traits::LogSink;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

/// Value type of a counter gate
pub type Count = i64;

/// Counter that threads can wait on
///
/// # Example
///
/// ```
/// use sync_gate::core::sync::{CounterGate, WaitOutcome};
///
/// let counter = CounterGate::new(true, 0);
/// std::thread::scope(|s| {
///     s.spawn(|| {
///         counter.increase(2);
///         counter.increment();
///     });
///     assert_eq!(counter.wait_at_least(3, None), WaitOutcome::ConditionMet);
/// });
/// ```
#[derive(Debug, Default)]
pub struct CounterGate {
    gate: GatedValue<Count>,
}

impl CounterGate {
    pub fn new(enabled: bool, initial: Count) -> Self {
        Self {
            gate: GatedValue::new(enabled, initial),
        }
    }

    pub fn with_config(enabled: bool, initial: Count, config: GateConfig) -> Self {
        Self {
            gate: GatedValue::with_config(enabled, initial, config),
        }
    }

    /// Replace the diagnostic sink
    pub fn with_sink(self, sink: Arc<dyn LogSink>) -> Self {
        Self {
            gate: self.gate.with_sink(sink),
        }
    }

    /// Underlying generic gate
    #[inline]
    pub fn as_gate(&self) -> &GatedValue<Count> {
        &self.gate
    }

    /// Add `delta` and wake every waiter
    pub fn increase(&self, delta: Count) {
        self.apply(delta, Count::checked_add, Count::saturating_add, "increase");
    }

    /// Subtract `delta` and wake every waiter
    pub fn decrease(&self, delta: Count) {
        self.apply(delta, Count::checked_sub, Count::saturating_sub, "decrease");
    }

    #[inline]
    pub fn increment(&self) {
        self.increase(1);
    }

    #[inline]
    pub fn decrement(&self) {
        self.decrease(1);
    }

    fn apply(
        &self,
        delta: Count,
        checked: fn(Count, Count) -> Option<Count>,
        saturating: fn(Count, Count) -> Count,
        op: &'static str,
    ) {
        let clamped = self.gate.update(|v| match checked(*v, delta) {
            Some(next) => {
                *v = next;
                None
            }
            None => {
                let before = *v;
                *v = saturating(before, delta);
                Some(before)
            }
        });

        if let Some(before) = clamped {
            self.gate.emit(Level::WARN, || {
                format!(
                    "[{}] {} by {} from {} saturated",
                    self.gate.config().label,
                    op,
                    delta,
                    before
                )
            });
        }
    }

    pub fn wait_equal(&self, target: Count, timeout: Option<Duration>) -> WaitOutcome {
        self.gate.wait(|v| *v == target, timeout)
    }

    #[doc(alias = "wait_greater_equal")]
    pub fn wait_at_least(&self, target: Count, timeout: Option<Duration>) -> WaitOutcome {
        self.gate.wait(|v| *v >= target, timeout)
    }

    pub fn wait_greater(&self, target: Count, timeout: Option<Duration>) -> WaitOutcome {
        self.gate.wait(|v| *v > target, timeout)
    }

    pub fn wait_less(&self, target: Count, timeout: Option<Duration>) -> WaitOutcome {
        self.gate.wait(|v| *v < target, timeout)
    }

    pub fn wait_less_equal(&self, target: Count, timeout: Option<Duration>) -> WaitOutcome {
        self.gate.wait(|v| *v <= target, timeout)
    }

    /// Wait for a positive count, then consume one unit
    ///
    /// The decrement happens in the same critical section as the check, so
    /// concurrent consumers never take the same unit. On `Timeout` or
    /// `Disabled` the counter is left untouched.
    pub fn wait_and_decrement(&self, timeout: Option<Duration>) -> WaitOutcome {
        self.gate.wait_and_modify(|v| *v > 0, timeout, |v| *v -= 1)
    }

    #[inline]
    pub fn value(&self) -> Count {
        self.gate.value()
    }

    #[inline]
    pub fn set_value(&self, value: Count) {
        self.gate.set_value(value);
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
    use parking_lot::Mutex;
    use std::thread;

    #[derive(Default)]
    struct CaptureSink(Mutex<Vec<(Level, String)>>);

    impl LogSink for CaptureSink {
        fn log(&self, level: Level, message: &str) {
            self.0.lock().push((level, message.to_string()));
        }
    }

    #[test]
    fn test_increase_decrease() {
        let counter = CounterGate::new(true, 0);
        counter.increase(5);
        counter.decrease(2);
        counter.increment();
        counter.decrement();
        assert_eq!(counter.value(), 3);

        counter.decrease(10);
        assert_eq!(counter.value(), -7);
    }

    #[test]
    fn test_saturation_is_reported() {
        let sink = Arc::new(CaptureSink::default());
        let counter = CounterGate::with_config(true, Count::MAX - 1, GateConfig::named("sat"))
            .with_sink(sink.clone());

        counter.increase(5);
        assert_eq!(counter.value(), Count::MAX);

        counter.set_value(Count::MIN);
        counter.decrement();
        assert_eq!(counter.value(), Count::MIN);

        let lines = sink.0.lock();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|(level, msg)| *level == Level::WARN && msg.contains("[sat]")));
    }

    #[test]
    fn test_comparison_waits_immediate() {
        let counter = CounterGate::new(true, 4);
        let now = Some(Duration::ZERO);
        assert!(counter.wait_equal(4, now).is_condition_met());
        assert!(counter.wait_at_least(4, now).is_condition_met());
        assert!(counter.wait_greater(4, now).is_timeout());
        assert!(counter.wait_less(5, now).is_condition_met());
        assert!(counter.wait_less_equal(3, now).is_timeout());
    }

    #[test]
    fn test_wait_and_decrement_consumes_each_unit_once() {
        let counter = CounterGate::new(true, 0);
        let consumed = std::sync::atomic::AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    while counter.wait_and_decrement(None).is_condition_met() {
                        consumed.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    }
                });
            }

            counter.increase(100);
            counter.wait_equal(0, Some(Duration::from_secs(5)));
            counter.blocking_disable();
        });

        assert_eq!(consumed.into_inner(), 100);
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn test_disabled_counter_returns_immediately() {
        let counter = CounterGate::new(false, 0);
        assert_eq!(counter.wait_and_decrement(None), WaitOutcome::Disabled);
        assert_eq!(counter.wait_equal(0, None), WaitOutcome::Disabled);
    }
}
