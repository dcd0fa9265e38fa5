/*!
 * Memory Module
 *
 * Contiguous allocation over a fixed-size address space.
 *
 * ## Operations
 *
 * - **Placement**: first-fit, best-fit and worst-fit selection among free blocks
 * - **Splitting**: a larger block is split into the allocated head and a free remainder
 * - **Coalescing**: adjacent free blocks are merged after every deallocation
 * - **Fragmentation**: external fragmentation is free memory outside the largest free block
 *
 * Block lists are treated as values. Each operation returns a new list and
 * leaves its input untouched.
 */

pub mod allocator;
pub mod coalesce;
pub mod fragmentation;
pub mod placement;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export for convenience
pub use allocator::ContiguousAllocator;
pub use coalesce::{coalesce, is_coalesced};
pub use fragmentation::{compute_fragmentation, free_memory, used_memory};
pub use placement::{largest_free_block, select_block};
pub use traits::*;
pub use types::*;
pub use validation::{partition_layout, validate_layout};
