/*!
 * Error Types
 * Top-level error aggregating every subsystem's errors
 */

use miette::Diagnostic;
use thiserror::Error;

pub use crate::memory::MemoryError;
pub use crate::simulation::SimulationError;
pub use crate::snapshot::SnapshotError;

/// Any error the simulator can surface
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SimulatorError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("Invalid command: {0}")]
    #[diagnostic(code(shell::invalid_command), help("Type `help` for the command list."))]
    InvalidCommand(String),
}

/// Common result type for simulator operations
pub type SimulatorResult<T> = Result<T, SimulatorError>;
