/*!
 * Core Module
 * Shared identifiers, limits and error types
 */

pub mod errors;
pub mod id;
pub mod limits;
pub mod types;

pub use errors::{SimulatorError, SimulatorResult};
pub use id::{AtomicGenerator, IdGenerator};
pub use types::*;
