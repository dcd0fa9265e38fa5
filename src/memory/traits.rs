/*!
 * Memory Traits
 * The narrow interface callers use to drive the allocator
 */

use super::fragmentation::compute_fragmentation;
use super::types::*;
use crate::core::types::{ProcessId, Size};

/// Contiguous block allocator
///
/// Every operation takes the current block list by reference and returns a
/// new one; implementations keep no block state of their own.
pub trait BlockAllocator: Send + Sync {
    /// Place `process` into a free block chosen by `algorithm`
    fn allocate(
        &self,
        blocks: &[MemoryBlock],
        process: &Process,
        algorithm: AllocationAlgorithm,
    ) -> AllocationOutcome;

    /// Free every block owned by `process_id` and coalesce the result
    fn deallocate(&self, blocks: &[MemoryBlock], process_id: ProcessId) -> Vec<MemoryBlock>;

    /// External and internal fragmentation of `blocks`
    fn fragmentation(&self, blocks: &[MemoryBlock], total_memory: Size) -> Fragmentation {
        compute_fragmentation(blocks, total_memory)
    }
}
