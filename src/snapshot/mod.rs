/*!
 * Snapshot Module
 *
 * Named snapshots of a simulation (block list, process list, algorithm and
 * derived stats), stored per identity. Authentication happens elsewhere; the
 * repositories only see an already-established [`Identity`].
 */

pub mod local;
pub mod memory;
pub mod traits;
pub mod types;

pub use local::JsonFileRepository;
pub use memory::InMemoryRepository;
pub use traits::SnapshotRepository;
pub use types::*;
