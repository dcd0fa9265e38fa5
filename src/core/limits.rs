/*!
 * System Limits and Constants
 *
 * Defaults for the simulated address space and the thresholds derived from it.
 * All sizes are in KB, the simulator's memory unit.
 */

// =============================================================================
// ADDRESS SPACE
// =============================================================================

/// Total simulated memory (1MB)
pub const DEFAULT_TOTAL_MEMORY: usize = 1024;

/// Initial fixed partitions the address space starts with
/// Sums to DEFAULT_TOTAL_MEMORY
pub const DEFAULT_PARTITIONS: [usize; 3] = [256, 512, 256];

// =============================================================================
// MEMORY PRESSURE
// =============================================================================

/// Usage ratio at which pressure is reported as medium
pub const MEDIUM_PRESSURE_RATIO: f64 = 0.60;

/// Usage ratio at which pressure is reported as high
pub const HIGH_PRESSURE_RATIO: f64 = 0.80;

/// Usage ratio at which pressure is reported as critical
pub const CRITICAL_PRESSURE_RATIO: f64 = 0.95;

// =============================================================================
// SNAPSHOTS
// =============================================================================

/// Longest accepted snapshot name (after trimming)
pub const MAX_SNAPSHOT_NAME_LEN: usize = 128;

/// Longest accepted process name (after trimming)
pub const MAX_PROCESS_NAME_LEN: usize = 64;

/// Default column width for the text memory map
pub const DEFAULT_MAP_COLUMNS: usize = 64;
