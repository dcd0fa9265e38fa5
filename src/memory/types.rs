/*!
 * Memory Types
 * Blocks, process requests, placement policies and allocation outcomes
 */

use crate::core::limits::{CRITICAL_PRESSURE_RATIO, HIGH_PRESSURE_RATIO, MEDIUM_PRESSURE_RATIO};
use crate::core::types::{Address, BlockId, ProcessId, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
///
/// Expected allocation failures are not errors (see [`AllocationFailure`]).
/// These describe block lists or selectors that violate the core's preconditions.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Block layout is empty")]
    #[diagnostic(
        code(memory::empty_layout),
        help("A layout must contain at least one block covering the address space.")
    )]
    EmptyLayout,

    #[error("Block {block} has zero size")]
    #[diagnostic(code(memory::zero_sized_block))]
    ZeroSizedBlock { block: BlockId },

    #[error("Block {block} starts at {found}, expected {expected}")]
    #[diagnostic(
        code(memory::discontiguous),
        help("Blocks must be ordered by start with no gaps or overlaps.")
    )]
    Discontiguous {
        block: BlockId,
        expected: Address,
        found: Address,
    },

    #[error("Blocks cover {actual} KB but total memory is {expected} KB")]
    #[diagnostic(code(memory::capacity_mismatch))]
    CapacityMismatch { expected: Size, actual: Size },

    #[error("Block id {0} appears more than once")]
    #[diagnostic(code(memory::duplicate_block))]
    DuplicateBlockId(BlockId),

    #[error("Process {0} owns more than one block")]
    #[diagnostic(
        code(memory::duplicate_owner),
        help("A process may own exactly one block at a time.")
    )]
    DuplicateOwner(ProcessId),

    #[error("Unknown allocation algorithm: {0}")]
    #[diagnostic(
        code(memory::unknown_algorithm),
        help("Expected one of: first-fit, best-fit, worst-fit.")
    )]
    UnknownAlgorithm(String),
}

/// Identity of the process holding a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOwner {
    pub process_id: ProcessId,
    pub process_name: String,
}

/// A contiguous span of the simulated address space
///
/// A block is free exactly when it has no owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub id: BlockId,
    pub start: Address,
    pub size: Size,
    pub owner: Option<BlockOwner>,
}

impl MemoryBlock {
    pub fn free(id: BlockId, start: Address, size: Size) -> Self {
        Self {
            id,
            start,
            size,
            owner: None,
        }
    }

    pub fn allocated(id: BlockId, start: Address, size: Size, process: &Process) -> Self {
        Self {
            id,
            start,
            size,
            owner: Some(BlockOwner {
                process_id: process.id,
                process_name: process.name.clone(),
            }),
        }
    }

    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// First address past the block
    pub fn end(&self) -> Address {
        self.start + self.size
    }

    pub fn process_id(&self) -> Option<ProcessId> {
        self.owner.as_ref().map(|o| o.process_id)
    }

    pub fn process_name(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.process_name.as_str())
    }

    pub fn is_owned_by(&self, pid: ProcessId) -> bool {
        self.process_id() == Some(pid)
    }

    /// Same span, owner cleared
    pub fn released(&self) -> Self {
        Self {
            owner: None,
            ..self.clone()
        }
    }
}

/// A unit of demand for memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: ProcessId,
    pub name: String,
    pub size: Size,
    pub allocated: bool,
    pub block_id: Option<BlockId>,
}

impl Process {
    /// New unbound request
    pub fn new(id: ProcessId, name: impl Into<String>, size: Size) -> Self {
        Self {
            id,
            name: name.into(),
            size,
            allocated: false,
            block_id: None,
        }
    }

    /// Mark the request as holding `block_id`
    pub fn bind(mut self, block_id: BlockId) -> Self {
        self.allocated = true;
        self.block_id = Some(block_id);
        self
    }
}

/// Placement policy used to choose among candidate free blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationAlgorithm {
    /// Lowest-addressed block that fits
    #[default]
    FirstFit,
    /// Smallest block that fits
    BestFit,
    /// Largest block that fits
    WorstFit,
}

impl AllocationAlgorithm {
    pub const ALL: [AllocationAlgorithm; 3] = [
        AllocationAlgorithm::FirstFit,
        AllocationAlgorithm::BestFit,
        AllocationAlgorithm::WorstFit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationAlgorithm::FirstFit => "first-fit",
            AllocationAlgorithm::BestFit => "best-fit",
            AllocationAlgorithm::WorstFit => "worst-fit",
        }
    }
}

impl fmt::Display for AllocationAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationAlgorithm {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-fit" | "first" => Ok(AllocationAlgorithm::FirstFit),
            "best-fit" | "best" => Ok(AllocationAlgorithm::BestFit),
            "worst-fit" | "worst" => Ok(AllocationAlgorithm::WorstFit),
            _ => Err(MemoryError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Why an allocation could not be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AllocationFailure {
    /// Every block is allocated
    NoFreeBlock,
    /// Free blocks exist but none is large enough
    NoSuitableBlock { requested: Size, largest_free: Size },
}

impl fmt::Display for AllocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AllocationFailure::NoFreeBlock => write!(f, "no free block available"),
            AllocationFailure::NoSuitableBlock {
                requested,
                largest_free,
            } => write!(
                f,
                "no free block large enough for {} KB (largest free block is {} KB)",
                requested, largest_free
            ),
        }
    }
}

/// Result of an allocation attempt
///
/// Both arms carry a complete block list; on failure it is the input, unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationOutcome {
    Allocated {
        blocks: Vec<MemoryBlock>,
        block_id: BlockId,
    },
    Failed {
        blocks: Vec<MemoryBlock>,
        reason: AllocationFailure,
    },
}

impl AllocationOutcome {
    pub fn success(&self) -> bool {
        matches!(self, AllocationOutcome::Allocated { .. })
    }

    pub fn blocks(&self) -> &[MemoryBlock] {
        match self {
            AllocationOutcome::Allocated { blocks, .. } | AllocationOutcome::Failed { blocks, .. } => {
                blocks
            }
        }
    }

    pub fn into_blocks(self) -> Vec<MemoryBlock> {
        match self {
            AllocationOutcome::Allocated { blocks, .. } | AllocationOutcome::Failed { blocks, .. } => {
                blocks
            }
        }
    }

    /// Block granted to the process, if any
    pub fn block_id(&self) -> Option<BlockId> {
        match self {
            AllocationOutcome::Allocated { block_id, .. } => Some(*block_id),
            AllocationOutcome::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<AllocationFailure> {
        match self {
            AllocationOutcome::Allocated { .. } => None,
            AllocationOutcome::Failed { reason, .. } => Some(*reason),
        }
    }
}

/// Fragmentation figures for a block list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fragmentation {
    /// Free memory outside the largest free block
    pub external: Size,
    /// Always 0: allocations are split to the exact requested size
    pub internal: Size,
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub free_memory: Size,
    pub internal_fragmentation: Size,
    pub external_fragmentation: Size,
    pub allocated_processes: usize,
    #[serde(default)]
    pub largest_free_block: Size,
    #[serde(default)]
    pub free_block_count: usize,
}

impl MemoryStats {
    pub fn utilization_percentage(&self) -> f64 {
        percentage(self.used_memory, self.total_memory)
    }

    pub fn external_fragmentation_percentage(&self) -> f64 {
        percentage(self.external_fragmentation, self.total_memory)
    }

    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.utilization_percentage() / 100.0)
    }
}

fn percentage(part: Size, total: Size) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64) * 100.0
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_ratio(usage_ratio: f64) -> Self {
        if usage_ratio >= CRITICAL_PRESSURE_RATIO {
            MemoryPressure::Critical
        } else if usage_ratio >= HIGH_PRESSURE_RATIO {
            MemoryPressure::High
        } else if usage_ratio >= MEDIUM_PRESSURE_RATIO {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
