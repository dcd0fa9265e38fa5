/*!
 * Snapshot Traits
 * Storage abstraction for named simulation snapshots
 */

use super::types::*;
use uuid::Uuid;

/// Snapshot repository keyed by identity
///
/// Records are private to the identity that saved them: looking up another
/// identity's record behaves exactly like looking up a missing one.
pub trait SnapshotRepository: Send + Sync {
    /// Store `snapshot` under `owner`; the name is trimmed before storing
    fn save(&self, owner: &Identity, snapshot: Snapshot) -> SnapshotResult<SnapshotSummary>;

    /// All snapshots of `owner`, most recent first
    fn list(&self, owner: &Identity) -> SnapshotResult<Vec<SnapshotSummary>>;

    /// Remove one snapshot
    fn delete(&self, owner: &Identity, id: Uuid) -> SnapshotResult<()>;

    /// Return the stored snapshot verbatim
    fn load(&self, owner: &Identity, id: Uuid) -> SnapshotResult<Snapshot>;
}
