/*!
 * Gated Value
 *
 * A shared value plus an enabled flag, guarded by one parking_lot mutex,
 * that threads can block on until a predicate over the value holds.
 *
 * # Design: One Lock, Two Condvars
 *
 * - `changed` is broadcast on every mutation of the value or the flag; each
 *   waiter re-checks its own predicate (thundering herd is accepted).
 * - `drained` is signalled by the last waiter leaving a disabled gate, so
 *   `blocking_disable` sleeps on it instead of spinning with the lock held.
 *
 * Both condvars are bound to the same mutex, and every read or write of the
 * value, the flag, and the waiter count happens with that mutex held.
 */

use super::config::GateConfig;
use super::outcome::WaitOutcome;
use super::traits::{LogSink, TracingSink};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Level;

/// State protected by the gate lock
struct GateState<T> {
    value: T,
    enabled: bool,
    /// Threads currently inside `wait`
    waiting: usize,
}

/// Registration of one thread inside `wait`
///
/// Holds the lock for the whole wait. Dropping it decrements the waiter count
/// before the lock is released, on every exit path including a panicking
/// predicate.
struct Waiter<'a, T> {
    guard: MutexGuard<'a, GateState<T>>,
    drained: &'a Condvar,
}

impl<'a, T> Waiter<'a, T> {
    fn enter(mut guard: MutexGuard<'a, GateState<T>>, drained: &'a Condvar) -> Self {
        guard.waiting += 1;
        Self { guard, drained }
    }
}

impl<T> Deref for Waiter<'_, T> {
    type Target = GateState<T>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T> DerefMut for Waiter<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<T> Drop for Waiter<'_, T> {
    fn drop(&mut self) {
        self.guard.waiting -= 1;
        if self.guard.waiting == 0 && !self.guard.enabled {
            self.drained.notify_all();
        }
    }
}

/// Shared value that threads can wait on
///
/// # States
///
/// - **Enabled**: waits block until their predicate holds or they time out
/// - **Disabled**: every wait, current or future, returns `Disabled` at once
///
/// `enable` and `disable`/`blocking_disable` move between the two; neither is
/// terminal.
///
/// # Sharing
///
/// The gate is never cloned. Share it by reference (scoped threads) or wrap
/// it in an `Arc`. Because `wait` borrows the gate, the borrow checker already
/// keeps it alive while any thread is blocked; `blocking_disable` is for the
/// logical side of teardown, guaranteeing nobody is still inside `wait` when
/// it returns.
///
/// # Example
///
/// ```
/// use sync_gate::core::sync::{GatedValue, WaitOutcome};
/// use std::time::Duration;
///
/// let gate = GatedValue::new(true, 0u32);
/// std::thread::scope(|s| {
///     s.spawn(|| gate.set_value(7));
///     let outcome = gate.wait(|v| *v == 7, Some(Duration::from_secs(5)));
///     assert_eq!(outcome, WaitOutcome::ConditionMet);
/// });
/// ```
pub struct GatedValue<T> {
    state: Mutex<GateState<T>>,
    changed: Condvar,
    drained: Condvar,
    config: GateConfig,
    sink: Arc<dyn LogSink>,
}

impl<T> GatedValue<T> {
    /// Create a gate with the default configuration
    pub fn new(enabled: bool, value: T) -> Self {
        Self::with_config(enabled, value, GateConfig::default())
    }

    /// Create a gate with a custom configuration
    pub fn with_config(enabled: bool, value: T, config: GateConfig) -> Self {
        Self {
            state: Mutex::new(GateState {
                value,
                enabled,
                waiting: 0,
            }),
            changed: Condvar::new(),
            drained: Condvar::new(),
            config,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the diagnostic sink
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Snapshot of the value
    pub fn value(&self) -> T
    where
        T: Clone,
    {
        self.state.lock().value.clone()
    }

    /// Read the value under the lock without cloning it
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.lock().value)
    }

    /// Replace the value and wake every waiter
    pub fn set_value(&self, value: T) {
        let mut state = self.state.lock();
        state.value = value;
        self.changed.notify_all();
    }

    /// Mutate the value in place and wake every waiter
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut state = self.state.lock();
        let result = f(&mut state.value);
        self.changed.notify_all();
        result
    }

    /// Enable the gate
    ///
    /// Nobody can be blocked on a disabled gate, so there is nobody to wake.
    pub fn enable(&self) {
        self.state.lock().enabled = true;
    }

    /// Disable the gate and wake every waiter
    ///
    /// Does not block. Waiters still have to reacquire the lock to leave, so
    /// some may remain inside `wait` briefly after this returns; use
    /// `blocking_disable` when that matters.
    pub fn disable(&self) {
        let mut state = self.state.lock();
        state.enabled = false;
        self.changed.notify_all();
        let waiting = state.waiting;
        drop(state);

        if waiting > 0 {
            self.emit(Level::DEBUG, || {
                format!("[{}] disabled while {} threads waiting", self.config.label, waiting)
            });
        }
    }

    /// Disable the gate and block until no thread is inside `wait`
    ///
    /// **Blocking call.** The lock is released while sleeping on the drain
    /// condvar, so woken waiters can leave. Each sleep is bounded by
    /// `drain_check_interval` (floored at one millisecond); on expiry the wake
    /// is broadcast again. If another thread re-enables the gate before the
    /// drain completes, new waiters may block legitimately and the drain
    /// gives up.
    ///
    /// Diagnostic lines are emitted with the lock released.
    pub fn blocking_disable(&self) {
        let mut state = self.state.lock();
        state.enabled = false;
        self.changed.notify_all();

        if state.waiting == 0 {
            return;
        }

        let interval = self.config.effective_drain_check_interval();
        let pending = state.waiting;
        MutexGuard::unlocked(&mut state, || {
            self.emit(Level::DEBUG, || {
                format!("[{}] draining {} waiting threads", self.config.label, pending)
            });
        });

        let started = Instant::now();
        while state.waiting > 0 {
            if state.enabled {
                let pending = state.waiting;
                drop(state);
                self.emit(Level::WARN, || {
                    format!(
                        "[{}] re-enabled during drain, {} threads left waiting",
                        self.config.label, pending
                    )
                });
                return;
            }

            let timed_out = self.drained.wait_for(&mut state, interval).timed_out();

            if timed_out && state.waiting > 0 && !state.enabled {
                let pending = state.waiting;
                self.changed.notify_all();
                MutexGuard::unlocked(&mut state, || {
                    self.emit(Level::WARN, || {
                        format!(
                            "[{}] drain still pending after {:?}: {} threads waiting",
                            self.config.label,
                            started.elapsed(),
                            pending
                        )
                    });
                });
            }
        }
        drop(state);

        self.emit(Level::DEBUG, || {
            format!("[{}] drained in {:?}", self.config.label, started.elapsed())
        });
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// Number of threads currently inside `wait` (diagnostics only)
    pub fn waiting_count(&self) -> usize {
        self.state.lock().waiting
    }

    /// Block until `predicate` holds, the gate is disabled, or `timeout` elapses
    ///
    /// The predicate runs with the gate lock held, so it must be quick and
    /// must not touch this gate. `None` waits forever; a timeout too large to
    /// form a deadline is treated the same way.
    pub fn wait<F>(&self, predicate: F, timeout: Option<Duration>) -> WaitOutcome
    where
        F: FnMut(&T) -> bool,
    {
        self.wait_inner(predicate, timeout, None::<fn(&mut T)>)
    }

    /// Block until the gate is disabled or `timeout` elapses
    ///
    /// Never returns `ConditionMet`.
    pub fn wait_until_disabled(&self, timeout: Option<Duration>) -> WaitOutcome {
        self.wait(|_| false, timeout)
    }

    /// Like `wait`, then run `action` on the value in the same critical section
    ///
    /// `action` only runs on `ConditionMet`, and is followed by a wake of all
    /// other waiters since the value changed.
    pub fn wait_and_modify<F, M>(
        &self,
        predicate: F,
        timeout: Option<Duration>,
        action: M,
    ) -> WaitOutcome
    where
        F: FnMut(&T) -> bool,
        M: FnOnce(&mut T),
    {
        self.wait_inner(predicate, timeout, Some(action))
    }

    fn wait_inner<F, M>(
        &self,
        mut predicate: F,
        timeout: Option<Duration>,
        action: Option<M>,
    ) -> WaitOutcome
    where
        F: FnMut(&T) -> bool,
        M: FnOnce(&mut T),
    {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut waiter = Waiter::enter(self.state.lock(), &self.drained);

        let satisfied = loop {
            if !waiter.enabled || predicate(&waiter.value) {
                break true;
            }

            match deadline {
                Some(deadline) => {
                    if self
                        .changed
                        .wait_until(&mut waiter.guard, deadline)
                        .timed_out()
                    {
                        // One last look: a change may have raced the deadline
                        break !waiter.enabled || predicate(&waiter.value);
                    }
                }
                None => self.changed.wait(&mut waiter.guard),
            }
        };

        if !waiter.enabled {
            WaitOutcome::Disabled
        } else if !satisfied {
            WaitOutcome::Timeout
        } else {
            if let Some(action) = action {
                action(&mut waiter.value);
                self.changed.notify_all();
            }
            WaitOutcome::ConditionMet
        }
    }

    /// Send a line to the sink, formatting only if it will be kept
    pub(crate) fn emit(&self, level: Level, message: impl FnOnce() -> String) {
        if self.sink.enabled(level) {
            self.sink.log(level, &message());
        }
    }
}

impl<T: Default> Default for GatedValue<T> {
    fn default() -> Self {
        Self::new(true, T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for GatedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("GatedValue");
        debug.field("label", &self.config.label);
        match self.state.try_lock() {
            Some(state) => debug
                .field("value", &state.value)
                .field("enabled", &state.enabled)
                .field("waiting", &state.waiting),
            None => debug.field("state", &format_args!("<locked>")),
        };
        debug.finish()
    }
}
