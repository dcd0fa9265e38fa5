/*!
 * Local Filesystem Snapshot Repository
 * One JSON document per snapshot under a per-identity directory
 */

use super::traits::SnapshotRepository;
use super::types::*;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const RECORD_EXTENSION: &str = "json";

/// Snapshot repository backed by JSON files
///
/// Layout: `<root>/<identity>/<uuid>.json`. The identity directory name is
/// sanitized, so the owner stored inside each record is what decides access.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    root: PathBuf,
    // Serializes sequence assignment and writes within this process
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileRepository {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an identity onto a single safe path component
    fn owner_dir(&self, owner: &Identity) -> PathBuf {
        let component: String = owner
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '@' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(component)
    }

    fn record_path(&self, owner: &Identity, id: Uuid) -> PathBuf {
        self.owner_dir(owner)
            .join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    fn io_error(e: std::io::Error, context: impl Into<String>) -> SnapshotError {
        SnapshotError::Io(format!("{}: {}", context.into(), e))
    }

    fn read_record(path: &Path) -> SnapshotResult<SnapshotRecord> {
        let data = fs::read(path).map_err(|e| Self::io_error(e, path.display().to_string()))?;
        serde_json::from_slice(&data)
            .map_err(|e| SnapshotError::Malformed(format!("{}: {}", path.display(), e)))
    }

    /// Every readable record stored for `owner`; unreadable files are skipped
    fn records(&self, owner: &Identity) -> SnapshotResult<Vec<SnapshotRecord>> {
        let dir = self.owner_dir(owner);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::io_error(e, dir.display().to_string())),
        };

        let mut records = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| Self::io_error(e, dir.display().to_string()))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            match Self::read_record(&path) {
                Ok(record) if &record.owner == owner => records.push(record),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot"),
            }
        }
        Ok(records)
    }

    /// Look up a record, treating other owners' records as missing
    fn owned_record(&self, owner: &Identity, id: Uuid) -> SnapshotResult<(PathBuf, SnapshotRecord)> {
        let path = self.record_path(owner, id);
        if !path.exists() {
            return Err(SnapshotError::NotFound(id));
        }
        let record = Self::read_record(&path)?;
        if &record.owner != owner || record.id != id {
            return Err(SnapshotError::NotFound(id));
        }
        Ok((path, record))
    }
}

impl SnapshotRepository for JsonFileRepository {
    fn save(&self, owner: &Identity, mut snapshot: Snapshot) -> SnapshotResult<SnapshotSummary> {
        snapshot.name = snapshot.validated_name()?;

        let _guard = self.write_lock.lock();

        let sequence = self
            .records(owner)?
            .iter()
            .map(|record| record.sequence + 1)
            .max()
            .unwrap_or(0);
        let record = SnapshotRecord::new(owner.clone(), sequence, snapshot);

        let dir = self.owner_dir(owner);
        fs::create_dir_all(&dir).map_err(|e| Self::io_error(e, dir.display().to_string()))?;

        let data = serde_json::to_vec_pretty(&record)
            .map_err(|e| SnapshotError::Malformed(e.to_string()))?;

        // Write to a temporary file first so readers never see a partial record
        let path = self.record_path(owner, record.id);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, data).map_err(|e| Self::io_error(e, tmp.display().to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| Self::io_error(e, path.display().to_string()))?;

        let summary = record.summary();
        info!(
            owner = %owner,
            id = %summary.id,
            name = %summary.name,
            path = %path.display(),
            "Saved snapshot"
        );
        Ok(summary)
    }

    fn list(&self, owner: &Identity) -> SnapshotResult<Vec<SnapshotSummary>> {
        let mut summaries: Vec<SnapshotSummary> =
            self.records(owner)?.iter().map(SnapshotRecord::summary).collect();
        sort_most_recent_first(&mut summaries);
        Ok(summaries)
    }

    fn delete(&self, owner: &Identity, id: Uuid) -> SnapshotResult<()> {
        let _guard = self.write_lock.lock();
        let (path, _) = self.owned_record(owner, id)?;
        fs::remove_file(&path).map_err(|e| Self::io_error(e, path.display().to_string()))?;

        info!(owner = %owner, id = %id, "Deleted snapshot");
        Ok(())
    }

    fn load(&self, owner: &Identity, id: Uuid) -> SnapshotResult<Snapshot> {
        self.owned_record(owner, id).map(|(_, record)| record.snapshot)
    }
}
