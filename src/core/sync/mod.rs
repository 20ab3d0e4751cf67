/*!
 * Synchronization Primitives
 *
 * Gates: a shared value guarded by one lock and condvar, from which threads
 * can block until a predicate over the value holds.
 * - `GatedValue<T>`: generic core (predicate waits, enable/disable, drain)
 * - `CounterGate`: `i64` counter with comparison waits
 * - `BooleanGate`: level-triggered open/closed signal
 *
 * # Outcomes
 *
 * Every wait returns a `WaitOutcome`: `ConditionMet`, `Timeout`, or
 * `Disabled`. Disablement takes priority over both of the others.
 *
 * # Use Cases
 *
 * - **Shutdown**: park workers until an owner disables the gate
 * - **Completion counting**: wait until N tasks have reported in
 * - **Activation**: consume units one at a time with `wait_and_decrement`
 */

mod boolean;
mod config;
mod counter;
mod gate;
mod outcome;
mod traits;

pub use boolean::BooleanGate;
pub use config::{GateConfig, DRAIN_CHECK_ENV, MIN_DRAIN_CHECK_INTERVAL};
pub use counter::{Count, CounterGate};
pub use gate::GatedValue;
pub use outcome::{WaitError, WaitOutcome, WaitResult};
pub use traits::{LogCrateSink, LogSink, NullSink, TracingSink, LOG_TARGET};
