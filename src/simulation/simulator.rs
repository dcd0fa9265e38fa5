/*!
 * Simulator
 * Caller-side state: the authoritative block list, the process list and the
 * selected policy, advanced one allocator operation at a time
 */

use super::types::*;
use crate::config::SimulatorConfig;
use crate::core::id::{AtomicGenerator, IdGenerator};
use crate::core::limits::{DEFAULT_PARTITIONS, DEFAULT_TOTAL_MEMORY, MAX_PROCESS_NAME_LEN};
use crate::core::types::{BlockId, ProcessId, Size};
use crate::memory::{
    partition_layout, validate_layout, AllocationAlgorithm, AllocationOutcome, BlockAllocator,
    ContiguousAllocator, Fragmentation, MemoryBlock, MemoryPressure, MemoryStats, Process,
};
use crate::snapshot::Snapshot;
use ahash::AHashMap;
use tracing::{info, warn};

/// Memory allocation simulation
#[derive(Debug, Clone)]
pub struct Simulation {
    allocator: ContiguousAllocator,
    process_ids: AtomicGenerator<ProcessId>,
    total_memory: Size,
    partitions: Vec<Size>,
    algorithm: AllocationAlgorithm,
    blocks: Vec<MemoryBlock>,
    processes: Vec<Process>,
}

impl Default for Simulation {
    fn default() -> Self {
        let allocator = ContiguousAllocator::new();
        let blocks = partition_layout(&DEFAULT_PARTITIONS, || allocator.block_ids().next());
        Self {
            allocator,
            process_ids: AtomicGenerator::default_start(),
            total_memory: DEFAULT_TOTAL_MEMORY,
            partitions: DEFAULT_PARTITIONS.to_vec(),
            algorithm: AllocationAlgorithm::default(),
            blocks,
            processes: Vec::new(),
        }
    }
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `partitions` laid out as consecutive free blocks
    pub fn with_layout(
        total_memory: Size,
        partitions: &[Size],
        algorithm: AllocationAlgorithm,
    ) -> SimulationResult<Self> {
        let allocator = ContiguousAllocator::new();
        let blocks = partition_layout(partitions, || allocator.block_ids().next());
        validate_layout(&blocks, total_memory)?;

        info!(
            total_memory,
            partitions = blocks.len(),
            %algorithm,
            "Simulation initialized"
        );

        Ok(Self {
            allocator,
            process_ids: AtomicGenerator::default_start(),
            total_memory,
            partitions: partitions.to_vec(),
            algorithm,
            blocks,
            processes: Vec::new(),
        })
    }

    pub fn from_config(config: &SimulatorConfig) -> SimulationResult<Self> {
        Self::with_layout(config.total_memory, &config.partitions, config.algorithm)
    }

    pub fn total_memory(&self) -> Size {
        self.total_memory
    }

    pub fn algorithm(&self) -> AllocationAlgorithm {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: AllocationAlgorithm) {
        if self.algorithm != algorithm {
            info!(from = %self.algorithm, to = %algorithm, "Switched allocation algorithm");
        }
        self.algorithm = algorithm;
    }

    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }

    /// First process with the given display name
    pub fn find_process_by_name(&self, name: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.name == name)
    }

    fn allocated_processes(&self) -> usize {
        self.processes.iter().filter(|p| p.allocated).count()
    }

    pub fn stats(&self) -> MemoryStats {
        MemoryStats::from_blocks(&self.blocks, self.total_memory, self.allocated_processes())
    }

    pub fn fragmentation(&self) -> Fragmentation {
        self.allocator.fragmentation(&self.blocks, self.total_memory)
    }

    /// Reject requests the allocator must never see
    fn validate_request(&self, name: &str, size: Size) -> SimulationResult<()> {
        if name.is_empty() {
            return Err(SimulationError::EmptyProcessName);
        }
        let len = name.chars().count();
        if len > MAX_PROCESS_NAME_LEN {
            return Err(SimulationError::ProcessNameTooLong {
                len,
                max: MAX_PROCESS_NAME_LEN,
            });
        }
        if size == 0 {
            return Err(SimulationError::InvalidSize);
        }
        if size > self.total_memory {
            return Err(SimulationError::ExceedsTotalMemory {
                requested: size,
                total: self.total_memory,
            });
        }
        Ok(())
    }

    /// Create a process and try to place it with the current algorithm
    ///
    /// Invalid requests are rejected before the allocator runs. A request that
    /// cannot be placed is kept as a pending process.
    pub fn add_process(&mut self, name: &str, size: Size) -> SimulationResult<AllocationReport> {
        let name = name.trim();
        self.validate_request(name, size)?;

        let process = Process::new(self.process_ids.next(), name, size);
        let outcome = self.allocator.allocate(&self.blocks, &process, self.algorithm);

        let report = match outcome {
            AllocationOutcome::Allocated { blocks, block_id } => {
                self.blocks = blocks;
                let process = process.bind(block_id);
                self.processes.push(process.clone());
                self.report_pressure();
                AllocationReport {
                    process,
                    algorithm: self.algorithm,
                    failure: None,
                }
            }
            AllocationOutcome::Failed { reason, .. } => {
                warn!(
                    pid = %process.id,
                    name = %process.name,
                    size,
                    %reason,
                    "Process left pending"
                );
                self.processes.push(process.clone());
                AllocationReport {
                    process,
                    algorithm: self.algorithm,
                    failure: Some(reason),
                }
            }
        };

        Ok(report)
    }

    /// Free the process's memory and drop its record
    ///
    /// Unknown ids leave the blocks as they are (apart from coalescing).
    pub fn deallocate(&mut self, id: ProcessId) -> DeallocationReport {
        let freed = self
            .blocks
            .iter()
            .filter(|block| block.is_owned_by(id))
            .map(|block| block.size)
            .sum();

        self.blocks = self.allocator.deallocate(&self.blocks, id);

        let process = self
            .processes
            .iter()
            .position(|p| p.id == id)
            .map(|index| self.processes.remove(index));

        DeallocationReport {
            process_id: id,
            process,
            freed,
        }
    }

    /// Back to the initial partition layout with no processes
    pub fn reset(&mut self) {
        let allocator = &self.allocator;
        self.blocks = partition_layout(&self.partitions, || allocator.block_ids().next());
        self.processes.clear();
        info!(partitions = self.blocks.len(), "Simulation reset");
    }

    fn report_pressure(&self) {
        let stats = self.stats();
        let pressure = stats.memory_pressure();
        if pressure >= MemoryPressure::High {
            warn!(
                %pressure,
                used = stats.used_memory,
                total = stats.total_memory,
                "Memory pressure {:.1}%",
                stats.utilization_percentage()
            );
        }
    }

    /// Capture the full state under `name`
    pub fn snapshot(&self, name: impl Into<String>) -> Snapshot {
        Snapshot {
            name: name.into(),
            algorithm: self.algorithm,
            total_memory: self.total_memory,
            blocks: self.blocks.clone(),
            processes: self.processes.clone(),
            stats: self.stats(),
        }
    }

    /// Replace the current state with a snapshot's
    ///
    /// The block layout and the process/block cross references are checked
    /// first; on error the simulation is left untouched.
    pub fn restore(&mut self, snapshot: Snapshot) -> SimulationResult<()> {
        validate_layout(&snapshot.blocks, snapshot.total_memory)?;
        check_process_bindings(&snapshot.blocks, &snapshot.processes)?;

        if let Some(max) = snapshot.blocks.iter().map(|b| b.id).max() {
            self.allocator.block_ids().advance_past(max);
        }
        if let Some(max) = snapshot.processes.iter().map(|p| p.id).max() {
            self.process_ids.advance_past(max);
        }

        if self.partitions.iter().sum::<Size>() != snapshot.total_memory {
            self.partitions = vec![snapshot.total_memory];
        }

        info!(
            name = %snapshot.name,
            blocks = snapshot.blocks.len(),
            processes = snapshot.processes.len(),
            algorithm = %snapshot.algorithm,
            "Restored snapshot"
        );

        self.total_memory = snapshot.total_memory;
        self.algorithm = snapshot.algorithm;
        self.blocks = snapshot.blocks;
        self.processes = snapshot.processes;
        Ok(())
    }
}

/// Every allocated process must point at a block of its own size, and every
/// owned block must belong to an allocated process
fn check_process_bindings(blocks: &[MemoryBlock], processes: &[Process]) -> SimulationResult<()> {
    let owners: AHashMap<ProcessId, (BlockId, Size)> = blocks
        .iter()
        .filter_map(|block| block.process_id().map(|pid| (pid, (block.id, block.size))))
        .collect();

    let mut seen = ahash::AHashSet::with_capacity(processes.len());
    for process in processes {
        if !seen.insert(process.id) {
            return Err(SimulationError::CorruptSnapshot(format!(
                "process {} listed twice",
                process.id
            )));
        }
        match (process.allocated, process.block_id, owners.get(&process.id)) {
            (true, Some(block_id), Some(&(owned, size)))
                if block_id == owned && process.size == size => {}
            (false, None, None) => {}
            _ => {
                return Err(SimulationError::CorruptSnapshot(format!(
                    "process {} does not match its block",
                    process.id
                )))
            }
        }
    }

    if let Some(orphan) = owners.keys().find(|pid| !seen.contains(*pid)) {
        return Err(SimulationError::CorruptSnapshot(format!(
            "block owned by unknown process {}",
            orphan
        )));
    }

    Ok(())
}
