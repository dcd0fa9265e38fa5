/*!
 * Snapshot Repository Tests
 * Same contract exercised against the in-memory and JSON file backends
 */

use contiguous_memsim::simulation::Simulation;
use contiguous_memsim::snapshot::{
    Identity, InMemoryRepository, JsonFileRepository, SnapshotError, SnapshotRepository,
};
use contiguous_memsim::memory::AllocationAlgorithm;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use uuid::Uuid;

fn populated() -> Simulation {
    let mut sim = Simulation::new();
    sim.set_algorithm(AllocationAlgorithm::WorstFit);
    sim.add_process("Editor", 300).unwrap();
    sim.add_process("Shell", 64).unwrap();
    sim
}

fn save_list_load_delete<R: SnapshotRepository>(repo: &R) {
    let alice = Identity::new("alice").unwrap();
    let bob = Identity::new("bob").unwrap();
    let sim = populated();

    let first = repo.save(&alice, sim.snapshot("  first  ")).unwrap();
    assert_eq!(first.name, "first");
    let second = repo.save(&alice, sim.snapshot("second")).unwrap();
    repo.save(&bob, sim.snapshot("bob's")).unwrap();

    let listed: Vec<String> = repo.list(&alice).unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(listed, vec!["second".to_string(), "first".to_string()]);

    let loaded = repo.load(&alice, first.id).unwrap();
    assert_eq!(loaded, sim.snapshot("first"));

    // Other identities cannot see or delete alice's snapshots
    assert_eq!(repo.load(&bob, first.id), Err(SnapshotError::NotFound(first.id)));
    assert_eq!(repo.delete(&bob, first.id), Err(SnapshotError::NotFound(first.id)));

    repo.delete(&alice, second.id).unwrap();
    let remaining: Vec<Uuid> = repo.list(&alice).unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(remaining, vec![first.id]);
    assert_eq!(repo.delete(&alice, second.id), Err(SnapshotError::NotFound(second.id)));

    assert_eq!(repo.list(&bob).unwrap().len(), 1);
}

#[test]
fn test_in_memory_repository_contract() {
    save_list_load_delete(&InMemoryRepository::new());
}

#[test]
fn test_json_file_repository_contract() {
    let dir = TempDir::new().unwrap();
    save_list_load_delete(&JsonFileRepository::new(dir.path()));
}

#[test]
fn test_json_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let owner = Identity::new("carol@example.com").unwrap();
    let sim = populated();

    let saved = JsonFileRepository::new(dir.path())
        .save(&owner, sim.snapshot("persisted"))
        .unwrap();

    let reopened = JsonFileRepository::new(dir.path());
    let snapshot = reopened.load(&owner, saved.id).unwrap();

    let mut restored = Simulation::new();
    restored.restore(snapshot).unwrap();
    assert_eq!(restored.blocks(), sim.blocks());
    assert_eq!(restored.algorithm(), AllocationAlgorithm::WorstFit);
}

#[test]
fn test_empty_names_and_identities_are_rejected() {
    let repo = InMemoryRepository::new();
    let owner = Identity::new("dave").unwrap();

    assert_eq!(
        repo.save(&owner, Simulation::new().snapshot("   ")),
        Err(SnapshotError::EmptyName)
    );
    assert_eq!(repo.count(&owner), 0);
    assert_eq!(Identity::new(" "), Err(SnapshotError::InvalidIdentity));
}

#[test]
fn test_malformed_file_is_skipped_in_listing() {
    let dir = TempDir::new().unwrap();
    let repo = JsonFileRepository::new(dir.path());
    let owner = Identity::new("erin").unwrap();

    repo.save(&owner, Simulation::new().snapshot("good")).unwrap();
    std::fs::write(dir.path().join("erin").join("garbage.json"), b"{not json").unwrap();

    let listed = repo.list(&owner).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "good");
}
