use aether_types::{DisputeStatus, LedgerError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DisputeError {
    #[error("challenge reason must not be empty")]
    EmptyReason,

    #[error("proof {id} already challenged (status {status})")]
    AlreadyChallenged { id: String, status: DisputeStatus },

    #[error("resolver failed, dispute left open: {0}")]
    Resolver(String),

    #[error("settlement failed: {0}")]
    Settlement(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, DisputeError>;
