/*!
 * Placement Policy Tests
 * First-fit, best-fit and worst-fit selection, splitting and exhaustion
 */

use contiguous_memsim::core::id::AtomicGenerator;
use contiguous_memsim::core::types::{BlockId, ProcessId};
use contiguous_memsim::memory::{
    validate_layout, AllocationAlgorithm, AllocationFailure, BlockAllocator, ContiguousAllocator,
    MemoryBlock, Process,
};
use pretty_assertions::assert_eq;

fn three_partitions() -> Vec<MemoryBlock> {
    vec![
        MemoryBlock::free(BlockId(1), 0, 256),
        MemoryBlock::free(BlockId(2), 256, 512),
        MemoryBlock::free(BlockId(3), 768, 256),
    ]
}

fn allocator() -> ContiguousAllocator {
    ContiguousAllocator::with_generator(AtomicGenerator::new(100))
}

fn allocated_start(blocks: &[MemoryBlock], pid: ProcessId) -> Option<usize> {
    blocks.iter().find(|b| b.is_owned_by(pid)).map(|b| b.start)
}

#[test]
fn test_request_200_per_policy() {
    let blocks = three_partitions();
    let process = Process::new(ProcessId(1), "P1", 200);

    let expected = [
        (AllocationAlgorithm::FirstFit, 0),
        (AllocationAlgorithm::BestFit, 0),
        (AllocationAlgorithm::WorstFit, 256),
    ];

    for (algorithm, start) in expected {
        let outcome = allocator().allocate(&blocks, &process, algorithm);
        assert!(outcome.success(), "{} should place 200 KB", algorithm);
        assert_eq!(
            allocated_start(outcome.blocks(), process.id),
            Some(start),
            "{} picked the wrong block",
            algorithm
        );
        assert_eq!(validate_layout(outcome.blocks(), 1024), Ok(()));
    }
}

#[test]
fn test_request_300_only_fits_the_middle_block() {
    let blocks = three_partitions();
    let process = Process::new(ProcessId(1), "P1", 300);

    for algorithm in AllocationAlgorithm::ALL {
        let outcome = allocator().allocate(&blocks, &process, algorithm);

        assert_eq!(
            outcome.into_blocks(),
            vec![
                MemoryBlock::free(BlockId(1), 0, 256),
                MemoryBlock::allocated(BlockId(2), 256, 300, &process),
                MemoryBlock::free(BlockId(100), 556, 212),
                MemoryBlock::free(BlockId(3), 768, 256),
            ],
            "{} split the wrong block",
            algorithm
        );
    }
}

#[test]
fn test_split_into_first_block() {
    let blocks = vec![MemoryBlock::free(BlockId(1), 0, 256)];
    let process = Process::new(ProcessId(9), "P9", 100);

    let outcome = allocator().allocate(&blocks, &process, AllocationAlgorithm::FirstFit);

    assert_eq!(outcome.block_id(), Some(BlockId(1)));
    assert_eq!(
        outcome.into_blocks(),
        vec![
            MemoryBlock::allocated(BlockId(1), 0, 100, &process),
            MemoryBlock::free(BlockId(100), 100, 156),
        ]
    );
}

#[test]
fn test_best_fit_prefers_tightest_block() {
    let owner = Process::new(ProcessId(1), "Keep", 100);
    let blocks = vec![
        MemoryBlock::free(BlockId(1), 0, 400),
        MemoryBlock::allocated(BlockId(2), 400, 100, &owner),
        MemoryBlock::free(BlockId(3), 500, 150),
        MemoryBlock::allocated(BlockId(4), 650, 100, &Process::new(ProcessId(2), "Keep2", 100)),
        MemoryBlock::free(BlockId(5), 750, 274),
    ];
    let process = Process::new(ProcessId(3), "P3", 120);

    let best = allocator().allocate(&blocks, &process, AllocationAlgorithm::BestFit);
    let first = allocator().allocate(&blocks, &process, AllocationAlgorithm::FirstFit);
    let worst = allocator().allocate(&blocks, &process, AllocationAlgorithm::WorstFit);

    assert_eq!(allocated_start(best.blocks(), process.id), Some(500));
    assert_eq!(allocated_start(first.blocks(), process.id), Some(0));
    assert_eq!(allocated_start(worst.blocks(), process.id), Some(0));
}

#[test]
fn test_exhaustion_leaves_blocks_unchanged() {
    let blocks = three_partitions();
    let process = Process::new(ProcessId(1), "Huge", 513);

    for algorithm in AllocationAlgorithm::ALL {
        let outcome = allocator().allocate(&blocks, &process, algorithm);
        assert!(!outcome.success());
        assert_eq!(
            outcome.failure(),
            Some(AllocationFailure::NoSuitableBlock {
                requested: 513,
                largest_free: 512
            })
        );
        assert_eq!(outcome.blocks(), blocks.as_slice());
    }
}

#[test]
fn test_full_memory_reports_no_free_block() {
    let alloc = allocator();
    let mut blocks = three_partitions();

    for (i, size) in [256, 512, 256].into_iter().enumerate() {
        let process = Process::new(ProcessId(i as u64 + 1), format!("P{}", i + 1), size);
        blocks = alloc
            .allocate(&blocks, &process, AllocationAlgorithm::FirstFit)
            .into_blocks();
    }
    assert!(blocks.iter().all(|b| !b.is_free()));

    let outcome = alloc.allocate(
        &blocks,
        &Process::new(ProcessId(4), "P4", 1),
        AllocationAlgorithm::BestFit,
    );
    assert_eq!(outcome.failure(), Some(AllocationFailure::NoFreeBlock));
}

#[test]
fn test_remainder_ids_are_unique_across_calls() {
    let alloc = allocator();
    let mut blocks = vec![MemoryBlock::free(BlockId(1), 0, 1024)];

    for i in 1..=5 {
        let process = Process::new(ProcessId(i), format!("P{}", i), 100);
        blocks = alloc
            .allocate(&blocks, &process, AllocationAlgorithm::FirstFit)
            .into_blocks();
    }

    let mut ids: Vec<BlockId> = blocks.iter().map(|b| b.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), blocks.len());
    assert_eq!(validate_layout(&blocks, 1024), Ok(()));
}
