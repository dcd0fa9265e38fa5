/*!
 * Contiguous Memory Allocation Simulator
 * Allocator core, simulation state and snapshot storage exposed as a library
 */

pub mod config;
pub mod core;
pub mod memory;
pub mod monitoring;
pub mod shell;
pub mod simulation;
pub mod snapshot;

// Re-exports
pub use crate::core::{SimulatorError, SimulatorResult};
pub use config::SimulatorConfig;
pub use memory::{
    AllocationAlgorithm, AllocationOutcome, BlockAllocator, ContiguousAllocator, Fragmentation,
    MemoryBlock, MemoryStats, Process,
};
pub use monitoring::init_tracing;
pub use shell::{Command, Shell};
pub use simulation::{MemoryMap, Simulation};
pub use snapshot::{Identity, InMemoryRepository, JsonFileRepository, Snapshot, SnapshotRepository};
