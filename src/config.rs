/*!
 * Simulator Configuration
 *
 * Defaults come from `core::limits`; each field can be overridden from the
 * environment:
 * - MEMSIM_TOTAL_MEMORY: total memory in KB
 * - MEMSIM_PARTITIONS: comma separated initial partition sizes in KB
 * - MEMSIM_ALGORITHM: first-fit, best-fit or worst-fit
 * - MEMSIM_SNAPSHOT_DIR: directory for saved snapshots (in-memory when unset)
 * - MEMSIM_TRACE_JSON: emit JSON logs
 */

use crate::core::limits::{DEFAULT_PARTITIONS, DEFAULT_TOTAL_MEMORY};
use crate::core::types::Size;
use crate::memory::AllocationAlgorithm;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_TOTAL_MEMORY: &str = "MEMSIM_TOTAL_MEMORY";
pub const ENV_PARTITIONS: &str = "MEMSIM_PARTITIONS";
pub const ENV_ALGORITHM: &str = "MEMSIM_ALGORITHM";
pub const ENV_SNAPSHOT_DIR: &str = "MEMSIM_SNAPSHOT_DIR";
pub const ENV_TRACE_JSON: &str = "MEMSIM_TRACE_JSON";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("{var} is not a valid size: {value:?}")]
    #[diagnostic(code(config::invalid_size), help("Sizes are positive integers in KB."))]
    InvalidSize { var: &'static str, value: String },

    #[error("{var} is not a valid algorithm: {value:?}")]
    #[diagnostic(
        code(config::invalid_algorithm),
        help("Expected one of: first-fit, best-fit, worst-fit.")
    )]
    InvalidAlgorithm { var: &'static str, value: String },

    #[error("Partitions sum to {sum} KB but total memory is {total} KB")]
    #[diagnostic(code(config::partition_mismatch))]
    PartitionMismatch { sum: Size, total: Size },

    #[error("At least one non-empty partition is required")]
    #[diagnostic(code(config::no_partitions))]
    NoPartitions,
}

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Size of the simulated address space (KB)
    pub total_memory: Size,

    /// Initial free partitions, in address order
    pub partitions: Vec<Size>,

    /// Placement policy used for new processes
    pub algorithm: AllocationAlgorithm,

    /// Where snapshots are stored; in-memory only when `None`
    pub snapshot_dir: Option<PathBuf>,

    /// JSON log output
    pub trace_json: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            total_memory: DEFAULT_TOTAL_MEMORY,
            partitions: DEFAULT_PARTITIONS.to_vec(),
            algorithm: AllocationAlgorithm::default(),
            snapshot_dir: None,
            trace_json: false,
        }
    }
}

impl SimulatorConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let total = lookup(ENV_TOTAL_MEMORY)
            .map(|value| parse_size(ENV_TOTAL_MEMORY, &value))
            .transpose()?;
        let partitions = lookup(ENV_PARTITIONS)
            .map(|value| {
                value
                    .split(',')
                    .map(|part| parse_size(ENV_PARTITIONS, part))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        match (total, partitions) {
            (Some(total), Some(partitions)) => {
                config.total_memory = total;
                config.partitions = partitions;
            }
            // A custom total without a layout starts as one free block
            (Some(total), None) => {
                config.total_memory = total;
                config.partitions = vec![total];
            }
            (None, Some(partitions)) => {
                config.total_memory = partitions.iter().sum();
                config.partitions = partitions;
            }
            (None, None) => {}
        }

        if let Some(value) = lookup(ENV_ALGORITHM) {
            config.algorithm = value.parse().map_err(|_| ConfigError::InvalidAlgorithm {
                var: ENV_ALGORITHM,
                value,
            })?;
        }

        config.snapshot_dir = lookup(ENV_SNAPSHOT_DIR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        config.trace_json = lookup(ENV_TRACE_JSON)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partitions.is_empty() || self.partitions.contains(&0) {
            return Err(ConfigError::NoPartitions);
        }
        let sum: Size = self.partitions.iter().sum();
        if sum != self.total_memory {
            return Err(ConfigError::PartitionMismatch {
                sum,
                total: self.total_memory,
            });
        }
        Ok(())
    }
}

fn parse_size(var: &'static str, value: &str) -> Result<Size, ConfigError> {
    match value.trim().parse::<Size>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidSize {
            var,
            value: value.to_string(),
        }),
    }
}
