/*!
 * Snapshot Types
 * Named simulation snapshots and the records repositories keep for them
 */

use crate::core::limits::MAX_SNAPSHOT_NAME_LEN;
use crate::core::types::{Sequence, Size};
use crate::memory::{AllocationAlgorithm, MemoryBlock, MemoryStats, Process};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Snapshot operation result
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Snapshot repository errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SnapshotError {
    #[error("Snapshot name must not be empty")]
    #[diagnostic(
        code(snapshot::empty_name),
        help("Give the simulation a name before saving it.")
    )]
    EmptyName,

    #[error("Snapshot name is {len} characters, limit is {max}")]
    #[diagnostic(code(snapshot::name_too_long))]
    NameTooLong { len: usize, max: usize },

    #[error("Identity must not be empty")]
    #[diagnostic(
        code(snapshot::invalid_identity),
        help("Snapshots are keyed by the caller's identity; sign in first.")
    )]
    InvalidIdentity,

    #[error("Snapshot {0} not found")]
    #[diagnostic(
        code(snapshot::not_found),
        help("The snapshot may have been deleted or belongs to another identity.")
    )]
    NotFound(Uuid),

    #[error("Malformed snapshot record: {0}")]
    #[diagnostic(code(snapshot::malformed))]
    Malformed(String),

    #[error("I/O error: {0}")]
    #[diagnostic(code(snapshot::io))]
    Io(String),
}

/// Authenticated principal that owns snapshots
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(raw: impl Into<String>) -> SnapshotResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SnapshotError::InvalidIdentity);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full simulation state as captured by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub algorithm: AllocationAlgorithm,
    pub total_memory: Size,
    pub blocks: Vec<MemoryBlock>,
    pub processes: Vec<Process>,
    pub stats: MemoryStats,
}

impl Snapshot {
    /// Trimmed, length-checked copy of the snapshot name
    pub fn validated_name(&self) -> SnapshotResult<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SnapshotError::EmptyName);
        }
        let len = name.chars().count();
        if len > MAX_SNAPSHOT_NAME_LEN {
            return Err(SnapshotError::NameTooLong {
                len,
                max: MAX_SNAPSHOT_NAME_LEN,
            });
        }
        Ok(name.to_string())
    }
}

/// A stored snapshot with its bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub id: Uuid,
    pub owner: Identity,
    pub created_at: OffsetDateTime,
    /// Save order within a repository; listing sorts on this
    pub sequence: Sequence,
    pub snapshot: Snapshot,
}

impl SnapshotRecord {
    pub fn new(owner: Identity, sequence: Sequence, snapshot: Snapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            created_at: OffsetDateTime::now_utc(),
            sequence,
            snapshot,
        }
    }

    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            id: self.id,
            name: self.snapshot.name.clone(),
            algorithm: self.snapshot.algorithm,
            total_memory: self.snapshot.total_memory,
            created_at: self.created_at,
            sequence: self.sequence,
            stats: self.snapshot.stats.clone(),
        }
    }
}

/// Listing entry for a stored snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub id: Uuid,
    pub name: String,
    pub algorithm: AllocationAlgorithm,
    pub total_memory: Size,
    pub created_at: OffsetDateTime,
    pub sequence: Sequence,
    pub stats: MemoryStats,
}

/// Order summaries most recent first
///
/// Save order is the sequence number; `created_at` follows the wall clock
/// and is only shown.
pub fn sort_most_recent_first(summaries: &mut [SnapshotSummary]) {
    summaries.sort_by(|a, b| b.sequence.cmp(&a.sequence));
}
