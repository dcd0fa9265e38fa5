/*!
 * Simulation Tests
 * Caller-side bookkeeping around the allocator core
 */

use contiguous_memsim::core::types::ProcessId;
use contiguous_memsim::memory::{is_coalesced, validate_layout, AllocationAlgorithm};
use contiguous_memsim::simulation::{Simulation, SimulationError};
use contiguous_memsim::memory::MemoryError;
use pretty_assertions::assert_eq;

#[test]
fn test_add_and_deallocate_process() {
    let mut sim = Simulation::new();

    let report = sim.add_process("P1", 100).unwrap();
    assert!(report.success());
    assert!(report.process.allocated);
    assert_eq!(report.algorithm, AllocationAlgorithm::FirstFit);

    let block_id = report.process.block_id.unwrap();
    let block = sim.blocks().iter().find(|b| b.id == block_id).unwrap();
    assert_eq!((block.start, block.size), (0, 100));
    assert_eq!(block.process_name(), Some("P1"));

    let stats = sim.stats();
    assert_eq!(stats.used_memory, 100);
    assert_eq!(stats.free_memory, 924);
    assert_eq!(stats.allocated_processes, 1);

    let report = sim.deallocate(report.process.id);
    assert_eq!(report.freed, 100);
    assert_eq!(report.process.map(|p| p.name), Some("P1".to_string()));
    assert!(sim.processes().is_empty());
    assert_eq!(sim.stats().used_memory, 0);
    assert!(is_coalesced(sim.blocks()));
}

#[test]
fn test_algorithm_switch_changes_placement() {
    let mut sim = Simulation::new();
    sim.set_algorithm(AllocationAlgorithm::WorstFit);

    let report = sim.add_process("W", 200).unwrap();
    let block = sim
        .blocks()
        .iter()
        .find(|b| Some(b.id) == report.process.block_id)
        .unwrap();
    assert_eq!(block.start, 256);
}

#[test]
fn test_unknown_process_deallocation_is_noop() {
    let mut sim = Simulation::new();
    sim.add_process("P1", 100).unwrap();
    let before = sim.stats();

    let report = sim.deallocate(ProcessId(999));

    assert_eq!(report.freed, 0);
    assert!(report.process.is_none());
    assert_eq!(sim.stats().used_memory, before.used_memory);
    assert_eq!(sim.processes().len(), 1);
}

#[test]
fn test_pending_process_can_be_removed() {
    let mut sim = Simulation::new();
    let report = sim.add_process("Big", 900).unwrap();
    assert!(!report.success());

    let removed = sim.deallocate(report.process.id);
    assert_eq!(removed.freed, 0);
    assert!(removed.process.is_some());
    assert!(sim.processes().is_empty());
}

#[test]
fn test_reset_restores_partitions() {
    let mut sim = Simulation::new();
    sim.add_process("A", 100).unwrap();
    sim.add_process("B", 300).unwrap();

    sim.reset();

    let sizes: Vec<usize> = sim.blocks().iter().map(|b| b.size).collect();
    assert_eq!(sizes, vec![256, 512, 256]);
    assert!(sim.blocks().iter().all(|b| b.is_free()));
    assert!(sim.processes().is_empty());
}

#[test]
fn test_custom_layout_must_cover_memory() {
    assert_eq!(
        Simulation::with_layout(1000, &[500, 400], AllocationAlgorithm::BestFit).unwrap_err(),
        SimulationError::Layout(MemoryError::CapacityMismatch {
            expected: 1000,
            actual: 900
        })
    );

    let sim = Simulation::with_layout(1000, &[500, 500], AllocationAlgorithm::BestFit).unwrap();
    assert_eq!(sim.algorithm(), AllocationAlgorithm::BestFit);
}

#[test]
fn test_snapshot_restore_round_trip() {
    let mut sim = Simulation::new();
    sim.set_algorithm(AllocationAlgorithm::BestFit);
    sim.add_process("A", 100).unwrap();
    let b = sim.add_process("B", 200).unwrap();
    sim.add_process("C", 50).unwrap();
    sim.deallocate(b.process.id);

    let snapshot = sim.snapshot("checkpoint");
    assert_eq!(snapshot.stats, sim.stats());

    let mut other = Simulation::new();
    other.restore(snapshot.clone()).unwrap();

    assert_eq!(other.blocks(), sim.blocks());
    assert_eq!(other.processes(), sim.processes());
    assert_eq!(other.algorithm(), AllocationAlgorithm::BestFit);

    // New ids continue past the restored ones
    let next = other.add_process("D", 10).unwrap();
    assert!(snapshot.processes.iter().all(|p| p.id < next.process.id));
    assert_eq!(validate_layout(other.blocks(), 1024), Ok(()));
    let mut ids: Vec<_> = other.blocks().iter().map(|b| b.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), other.blocks().len());
}

#[test]
fn test_restore_rejects_broken_layout() {
    let mut sim = Simulation::new();
    let mut snapshot = sim.snapshot("broken");
    snapshot.blocks.remove(1);

    assert!(matches!(
        sim.restore(snapshot),
        Err(SimulationError::Layout(MemoryError::Discontiguous { .. }))
    ));
}
