/*!
 * Fragmentation Accounting
 */

use super::placement::largest_free_block;
use super::types::{Fragmentation, MemoryBlock, MemoryStats};
use crate::core::types::Size;
use tracing::trace;

/// External fragmentation is the free memory a single request could never use:
/// everything free outside the largest free block.
pub fn compute_fragmentation(blocks: &[MemoryBlock], total_memory: Size) -> Fragmentation {
    let free = free_memory(blocks);
    let largest = largest_free_block(blocks);
    let external = free - largest;

    trace!(free, largest, external, total_memory, "Computed fragmentation");

    Fragmentation {
        external,
        internal: 0,
    }
}

/// Sum of all free block sizes
pub fn free_memory(blocks: &[MemoryBlock]) -> Size {
    blocks
        .iter()
        .filter(|block| block.is_free())
        .map(|block| block.size)
        .sum()
}

/// Sum of all allocated block sizes
pub fn used_memory(blocks: &[MemoryBlock]) -> Size {
    blocks
        .iter()
        .filter(|block| !block.is_free())
        .map(|block| block.size)
        .sum()
}

impl MemoryStats {
    /// Derive statistics from a block list
    ///
    /// `allocated_processes` comes from the caller's process list since the
    /// core does not keep process records.
    pub fn from_blocks(
        blocks: &[MemoryBlock],
        total_memory: Size,
        allocated_processes: usize,
    ) -> Self {
        let fragmentation = compute_fragmentation(blocks, total_memory);
        Self {
            total_memory,
            used_memory: used_memory(blocks),
            free_memory: free_memory(blocks),
            internal_fragmentation: fragmentation.internal,
            external_fragmentation: fragmentation.external,
            allocated_processes,
            largest_free_block: largest_free_block(blocks),
            free_block_count: blocks.iter().filter(|block| block.is_free()).count(),
        }
    }
}
