/*!
 * Core Types
 * Common types used across the simulator
 */

/// Offset into the simulated address space (KB)
pub type Address = usize;

/// Span length in the simulated address space (KB)
pub type Size = usize;

/// Monotonic sequence number used to order persisted records
pub type Sequence = u64;

pub use super::id::{BlockId, ProcessId};
