/*!
 * In-Memory Snapshot Repository
 */

use super::traits::SnapshotRepository;
use super::types::*;
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Snapshot repository held entirely in memory
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<DashMap<Identity, Vec<SnapshotRecord>, RandomState>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored for `owner`
    pub fn count(&self, owner: &Identity) -> usize {
        self.records.get(owner).map_or(0, |records| records.len())
    }
}

impl SnapshotRepository for InMemoryRepository {
    fn save(&self, owner: &Identity, mut snapshot: Snapshot) -> SnapshotResult<SnapshotSummary> {
        snapshot.name = snapshot.validated_name()?;

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let record = SnapshotRecord::new(owner.clone(), sequence, snapshot);
        let summary = record.summary();

        self.records.entry(owner.clone()).or_default().push(record);

        info!(owner = %owner, id = %summary.id, name = %summary.name, "Saved snapshot");
        Ok(summary)
    }

    fn list(&self, owner: &Identity) -> SnapshotResult<Vec<SnapshotSummary>> {
        let mut summaries: Vec<SnapshotSummary> = self
            .records
            .get(owner)
            .map(|records| records.iter().map(SnapshotRecord::summary).collect())
            .unwrap_or_default();

        sort_most_recent_first(&mut summaries);
        Ok(summaries)
    }

    fn delete(&self, owner: &Identity, id: Uuid) -> SnapshotResult<()> {
        let mut records = self
            .records
            .get_mut(owner)
            .ok_or(SnapshotError::NotFound(id))?;

        let position = records
            .iter()
            .position(|record| record.id == id)
            .ok_or(SnapshotError::NotFound(id))?;
        records.remove(position);

        info!(owner = %owner, id = %id, "Deleted snapshot");
        Ok(())
    }

    fn load(&self, owner: &Identity, id: Uuid) -> SnapshotResult<Snapshot> {
        self.records
            .get(owner)
            .and_then(|records| {
                records
                    .iter()
                    .find(|record| record.id == id)
                    .map(|record| record.snapshot.clone())
            })
            .ok_or(SnapshotError::NotFound(id))
    }
}
