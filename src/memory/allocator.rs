/*!
 * Contiguous Allocator Implementation
 * Allocation (with block splitting) and deallocation (with coalescing)
 */

use super::coalesce::coalesce;
use super::placement::select_block;
use super::traits::BlockAllocator;
use super::types::{AllocationAlgorithm, AllocationOutcome, MemoryBlock, Process};
use crate::core::id::{AtomicGenerator, IdGenerator};
use crate::core::types::{BlockId, ProcessId};
use tracing::{debug, info, warn};

/// Allocator over a fixed-size address space
///
/// The only state is the block id generator, so remainder blocks created by a
/// split never collide with existing ids.
#[derive(Debug, Clone, Default)]
pub struct ContiguousAllocator {
    block_ids: AtomicGenerator<BlockId>,
}

impl ContiguousAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing block id generator
    pub fn with_generator(block_ids: AtomicGenerator<BlockId>) -> Self {
        Self { block_ids }
    }

    pub fn block_ids(&self) -> &AtomicGenerator<BlockId> {
        &self.block_ids
    }

    /// Build the replacement for `selected` once a request of `process.size` lands in it
    ///
    /// An exact fit keeps the block and stamps the owner. A larger block is
    /// split into the allocated head (reusing the original id) and a free
    /// remainder with a fresh id.
    fn place(&self, selected: &MemoryBlock, process: &Process) -> Vec<MemoryBlock> {
        let head = MemoryBlock::allocated(selected.id, selected.start, process.size, process);

        if selected.size == process.size {
            return vec![head];
        }

        let remainder = MemoryBlock::free(
            self.block_ids.next(),
            selected.start + process.size,
            selected.size - process.size,
        );
        debug!(
            block = %selected.id,
            kept = process.size,
            remainder = remainder.size,
            remainder_start = remainder.start,
            "Split block"
        );

        vec![head, remainder]
    }
}

impl BlockAllocator for ContiguousAllocator {
    fn allocate(
        &self,
        blocks: &[MemoryBlock],
        process: &Process,
        algorithm: AllocationAlgorithm,
    ) -> AllocationOutcome {
        let index = match select_block(blocks, process.size, algorithm) {
            Ok(index) => index,
            Err(reason) => {
                warn!(
                    pid = %process.id,
                    size = process.size,
                    %algorithm,
                    %reason,
                    "Allocation failed"
                );
                return AllocationOutcome::Failed {
                    blocks: blocks.to_vec(),
                    reason,
                };
            }
        };

        let selected = &blocks[index];
        let replacement = self.place(selected, process);

        let mut rebuilt = Vec::with_capacity(blocks.len() + 1);
        rebuilt.extend_from_slice(&blocks[..index]);
        rebuilt.extend(replacement);
        rebuilt.extend_from_slice(&blocks[index + 1..]);

        info!(
            pid = %process.id,
            name = %process.name,
            size = process.size,
            start = selected.start,
            block = %selected.id,
            %algorithm,
            "Allocated block"
        );

        AllocationOutcome::Allocated {
            blocks: rebuilt,
            block_id: selected.id,
        }
    }

    fn deallocate(&self, blocks: &[MemoryBlock], process_id: ProcessId) -> Vec<MemoryBlock> {
        let mut freed = 0;
        let released: Vec<MemoryBlock> = blocks
            .iter()
            .map(|block| {
                if block.is_owned_by(process_id) {
                    freed += block.size;
                    block.released()
                } else {
                    block.clone()
                }
            })
            .collect();

        if freed == 0 {
            debug!(pid = %process_id, "No block owned by process, nothing to free");
        } else {
            info!(pid = %process_id, size = freed, "Deallocated block");
        }

        coalesce(&released)
    }
}
