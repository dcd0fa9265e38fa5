/*!
 * Simulation Types
 */

use crate::core::types::{ProcessId, Size};
use crate::memory::{AllocationAlgorithm, AllocationFailure, MemoryError, Process};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulation operation result
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Errors raised by the simulation before or around the allocator core
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimulationError {
    #[error("Please enter a process name")]
    #[diagnostic(code(simulation::empty_name))]
    EmptyProcessName,

    #[error("Process name is {len} characters, limit is {max}")]
    #[diagnostic(code(simulation::name_too_long))]
    ProcessNameTooLong { len: usize, max: usize },

    #[error("Process size must be positive")]
    #[diagnostic(
        code(simulation::invalid_size),
        help("Request at least 1 KB.")
    )]
    InvalidSize,

    #[error("Process size {requested} KB exceeds total memory of {total} KB")]
    #[diagnostic(code(simulation::exceeds_total_memory))]
    ExceedsTotalMemory { requested: Size, total: Size },

    #[error("Invalid memory layout: {0}")]
    #[diagnostic(transparent)]
    Layout(#[from] MemoryError),

    #[error("Corrupt snapshot: {0}")]
    #[diagnostic(
        code(simulation::corrupt_snapshot),
        help("Process records must match the block owners in the snapshot.")
    )]
    CorruptSnapshot(String),
}

/// Outcome of adding a process
///
/// A failed placement is still a successful call: the process is kept as a
/// pending entry and the reason is reported here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub process: Process,
    pub algorithm: AllocationAlgorithm,
    pub failure: Option<AllocationFailure>,
}

impl AllocationReport {
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Outcome of deallocating a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeallocationReport {
    pub process_id: ProcessId,
    /// The dropped process record, if the id was known
    pub process: Option<Process>,
    pub freed: Size,
}
