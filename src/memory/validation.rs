/*!
 * Layout Validation
 * Checks the partition invariant on block lists received from outside the core
 */

use super::types::{MemoryBlock, MemoryError, MemoryResult};
use crate::core::types::{BlockId, Size};
use ahash::AHashSet;

/// Verify that `blocks` partition `[0, total_memory)` exactly
///
/// Blocks must be in address order, start at 0, have no gaps or overlaps,
/// be non-empty, carry unique ids, and no process may own two blocks.
pub fn validate_layout(blocks: &[MemoryBlock], total_memory: Size) -> MemoryResult<()> {
    if blocks.is_empty() {
        return Err(MemoryError::EmptyLayout);
    }

    let mut ids = AHashSet::with_capacity(blocks.len());
    let mut owners = AHashSet::new();
    let mut expected = 0;

    for block in blocks {
        if block.size == 0 {
            return Err(MemoryError::ZeroSizedBlock { block: block.id });
        }
        if block.start != expected {
            return Err(MemoryError::Discontiguous {
                block: block.id,
                expected,
                found: block.start,
            });
        }
        if !ids.insert(block.id) {
            return Err(MemoryError::DuplicateBlockId(block.id));
        }
        if let Some(pid) = block.process_id() {
            if !owners.insert(pid) {
                return Err(MemoryError::DuplicateOwner(pid));
            }
        }
        expected = block.end();
    }

    if expected != total_memory {
        return Err(MemoryError::CapacityMismatch {
            expected: total_memory,
            actual: expected,
        });
    }

    Ok(())
}

/// Lay out consecutive free blocks of the given sizes starting at address 0
pub fn partition_layout(
    sizes: &[Size],
    mut next_id: impl FnMut() -> BlockId,
) -> Vec<MemoryBlock> {
    let mut start = 0;
    sizes
        .iter()
        .map(|&size| {
            let block = MemoryBlock::free(next_id(), start, size);
            start += size;
            block
        })
        .collect()
}
