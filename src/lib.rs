/*!
 * Sync Gate Library
 * Lock-protected values that threads can wait on until a predicate holds
 */

pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::core::sync::{
    BooleanGate, Count, CounterGate, GateConfig, GatedValue, LogCrateSink, LogSink, NullSink,
    TracingSink, WaitError, WaitOutcome, WaitResult,
};
pub use monitoring::init_tracing;
