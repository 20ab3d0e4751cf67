/*!
 * Monitoring
 * Tracing subscriber setup for gate diagnostics
 */

mod tracer;

pub use tracer::{init_tracing, TRACE_JSON_ENV};
