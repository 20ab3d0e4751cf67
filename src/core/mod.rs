/*!
 * Core Module
 * Synchronization primitives
 */

pub mod sync;

// Re-export for convenience
pub use sync::{
    BooleanGate, CounterGate, GateConfig, GatedValue, LogSink, WaitError, WaitOutcome, WaitResult,
};
