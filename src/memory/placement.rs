/*!
 * Placement Policies
 * Choosing a free block for a request under first-fit, best-fit and worst-fit
 */

use super::types::{AllocationAlgorithm, AllocationFailure, MemoryBlock};
use crate::core::types::Size;

/// Pick the index of the block that should satisfy a request of `size`
///
/// Blocks are scanned in list order, which is address order for any valid layout.
/// Ties under best-fit and worst-fit keep the earliest block.
pub fn select_block(
    blocks: &[MemoryBlock],
    size: Size,
    algorithm: AllocationAlgorithm,
) -> Result<usize, AllocationFailure> {
    let mut free = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| block.is_free())
        .peekable();

    if free.peek().is_none() {
        return Err(AllocationFailure::NoFreeBlock);
    }

    let mut candidates = free.filter(|(_, block)| block.size >= size);

    let selected = match algorithm {
        AllocationAlgorithm::FirstFit => candidates.next(),
        AllocationAlgorithm::BestFit => candidates.reduce(|best, current| {
            if current.1.size < best.1.size {
                current
            } else {
                best
            }
        }),
        AllocationAlgorithm::WorstFit => candidates.reduce(|worst, current| {
            if current.1.size > worst.1.size {
                current
            } else {
                worst
            }
        }),
    };

    selected
        .map(|(index, _)| index)
        .ok_or_else(|| AllocationFailure::NoSuitableBlock {
            requested: size,
            largest_free: largest_free_block(blocks),
        })
}

/// Size of the largest free block, 0 when everything is allocated
pub fn largest_free_block(blocks: &[MemoryBlock]) -> Size {
    blocks
        .iter()
        .filter(|block| block.is_free())
        .map(|block| block.size)
        .max()
        .unwrap_or(0)
}
