/*!
 * Free Block Coalescing
 * Merges runs of adjacent free blocks into a single block
 */

use super::types::MemoryBlock;
use tracing::debug;

/// Rebuild `blocks` in address order with every run of free blocks merged
///
/// A merged block keeps the start and id of the first block in its run.
/// Allocated blocks and isolated free blocks pass through unchanged.
pub fn coalesce(blocks: &[MemoryBlock]) -> Vec<MemoryBlock> {
    let mut sorted = blocks.to_vec();
    sorted.sort_by_key(|block| block.start);

    let before = sorted.len();
    let mut merged: Vec<MemoryBlock> = Vec::with_capacity(before);

    for block in sorted {
        match merged.last_mut() {
            Some(last) if last.is_free() && block.is_free() => last.size += block.size,
            _ => merged.push(block),
        }
    }

    if merged.len() < before {
        debug!(
            merged = before - merged.len(),
            blocks = merged.len(),
            "Coalesced adjacent free blocks"
        );
    }

    merged
}

/// True when no two neighbouring blocks are both free
pub fn is_coalesced(blocks: &[MemoryBlock]) -> bool {
    blocks
        .windows(2)
        .all(|pair| !(pair[0].is_free() && pair[1].is_free()))
}
