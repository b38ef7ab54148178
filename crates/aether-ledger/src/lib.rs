pub mod seed;
pub mod snapshot;
pub mod store;

pub use seed::{seed_proofs, SEED_PROOF_ID};
pub use snapshot::{FileSnapshots, MemorySnapshots, SnapshotStore, SNAPSHOT_FILE};
pub use store::{LedgerEvent, ProofStore};
