use aether_types::{ActionProof, Verdict};
use async_trait::async_trait;

/// A ruling rendered by the judge collaborator.
///
/// Deliberately carries no penalty figure: the reputation consequences of a
/// verdict are protocol policy (`Verdict::trust_delta`), not something a
/// resolver gets to choose per case.
#[derive(Debug, Clone)]
pub struct Ruling {
    pub verdict: Verdict,
    pub comment: String,
}

/// External adjudicator consulted when a proof is challenged. May take
/// arbitrarily long and may fail; a failure leaves the dispute open.
#[async_trait]
pub trait DisputeResolver: Send + Sync {
    async fn resolve(&self, proof: &ActionProof, challenge_reason: &str)
        -> anyhow::Result<Ruling>;
}
