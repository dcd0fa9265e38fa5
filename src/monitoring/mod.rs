/*!
 * Monitoring Module
 * Logging setup for the simulator
 */

pub mod tracer;

pub use tracer::{command_span, init_tracing};
