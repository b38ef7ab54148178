use crate::dispute::DisputeStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("proof already admitted: {id}")]
    DuplicateProof { id: String },

    #[error("proof not found: {0}")]
    ProofNotFound(String),

    #[error("dispute already resolved for {id}: {status}")]
    DisputeClosed { id: String, status: DisputeStatus },

    #[error("snapshot write failed: {0}")]
    Snapshot(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
