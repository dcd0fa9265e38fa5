/*!
 * Simulation Module
 *
 * The caller of the allocator core. Owns the canonical process list, the
 * total memory constant and the selected policy, persists the latest block
 * list after every operation, and renders the result.
 */

pub mod render;
pub mod simulator;
pub mod types;

pub use render::{MemoryMap, Segment};
pub use simulator::Simulation;
pub use types::*;
