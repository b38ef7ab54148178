/// Source of the ledger's decorative identifiers: proof fingerprints,
/// transaction hashes, block heights.
///
/// None of these carry cryptographic meaning; keeping the generation behind
/// one seam means a real hash function can replace the mock without touching
/// business logic.
pub trait IdentityGenerator: Send + Sync {
    /// Fingerprint for a newly admitted proof, e.g. `0x` + 64 hex chars.
    fn proof_fingerprint(&self) -> String;

    /// Hash recorded on a ledger transaction.
    fn tx_hash(&self) -> String;

    /// Identifier for a minted-reward transaction.
    fn reward_id(&self) -> String;

    /// Decorative block height stamped on a proof.
    fn block_height(&self) -> u64;
}
