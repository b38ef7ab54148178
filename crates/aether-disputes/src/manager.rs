use crate::error::{DisputeError, Result};
use crate::resolver::DisputeResolver;
use aether_economics::{AgentRegistry, RewardEngine};
use aether_ledger::ProofStore;
use aether_types::{ActionProof, DisputeStatus, ProofId, Verdict};
use std::sync::Arc;
use tracing::{info, warn};

/// Drives a challenge through the dispute state machine:
/// validate, mark disputed (optimistically, before the resolver answers),
/// resolve, apply the verdict, settle the consequences.
pub struct DisputeManager {
    store: Arc<ProofStore>,
    resolver: Arc<dyn DisputeResolver>,
    registry: Arc<AgentRegistry>,
    rewards: Arc<RewardEngine>,
}

impl DisputeManager {
    pub fn new(
        store: Arc<ProofStore>,
        resolver: Arc<dyn DisputeResolver>,
        registry: Arc<AgentRegistry>,
        rewards: Arc<RewardEngine>,
    ) -> Self {
        Self {
            store,
            resolver,
            registry,
            rewards,
        }
    }

    /// Challenge a proof. Refused if the proof has ever been challenged
    /// before; a resolver failure leaves the proof `Open` and disputed with
    /// no verdict — a legitimate degraded state that `retry_challenge` can
    /// pick up later.
    pub async fn challenge(&self, id: &ProofId, reason: &str) -> Result<ActionProof> {
        self.run_challenge(id, reason, false).await
    }

    /// Operator retry for a dispute stuck in `Open` after a resolver
    /// failure. Resolved proofs are still refused.
    pub async fn retry_challenge(&self, id: &ProofId, reason: &str) -> Result<ActionProof> {
        self.run_challenge(id, reason, true).await
    }

    async fn run_challenge(
        &self,
        id: &ProofId,
        reason: &str,
        allow_open: bool,
    ) -> Result<ActionProof> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DisputeError::EmptyReason);
        }

        let proof = self.store.get(id).await?;
        let reopenable = allow_open && proof.dispute_status == DisputeStatus::Open;
        if proof.dispute_status != DisputeStatus::None && !reopenable {
            return Err(DisputeError::AlreadyChallenged {
                id: id.to_string(),
                status: proof.dispute_status,
            });
        }

        // Optimistic marking: the proof reads as disputed while resolution
        // is pending.
        self.store.mark_disputed(id).await?;
        info!(proof = %id.short(), reason = %reason, "📣 Challenge submitted");

        let ruling = match self.resolver.resolve(&proof, reason).await {
            Ok(ruling) => ruling,
            Err(e) => {
                warn!(
                    proof = %id.short(),
                    error = %e,
                    "Resolver failed; dispute remains open pending retry"
                );
                return Err(DisputeError::Resolver(e.to_string()));
            }
        };

        let updated = self
            .store
            .apply_verdict(id, ruling.verdict, &ruling.comment, reason)
            .await?;

        self.settle(&updated, ruling.verdict).await?;
        Ok(updated)
    }

    async fn settle(&self, proof: &ActionProof, verdict: Verdict) -> Result<()> {
        self.registry
            .adjust_reputation(&proof.agent_id, verdict.trust_delta() as f64)
            .await
            .map_err(|e| DisputeError::Settlement(e.to_string()))?;

        if verdict == Verdict::Overturned {
            self.registry
                .record_dispute_loss(&proof.agent_id)
                .await
                .map_err(|e| DisputeError::Settlement(e.to_string()))?;
        }

        self.rewards
            .dispute_settlement(proof, verdict)
            .await
            .map_err(|e| DisputeError::Settlement(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Ruling;
    use aether_economics::RewardLedger;
    use aether_ledger::{MemorySnapshots, SEED_PROOF_ID};
    use aether_types::IdentityGenerator;
    use async_trait::async_trait;

    struct FixedIdentity;

    impl IdentityGenerator for FixedIdentity {
        fn proof_fingerprint(&self) -> String {
            "0xfp".to_string()
        }
        fn tx_hash(&self) -> String {
            "0xtx".to_string()
        }
        fn reward_id(&self) -> String {
            "reward-t".to_string()
        }
        fn block_height(&self) -> u64 {
            0
        }
    }

    struct FixedResolver(Verdict);

    #[async_trait]
    impl DisputeResolver for FixedResolver {
        async fn resolve(
            &self,
            _proof: &ActionProof,
            _challenge_reason: &str,
        ) -> anyhow::Result<Ruling> {
            Ok(Ruling {
                verdict: self.0,
                comment: "judicial comment".to_string(),
            })
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl DisputeResolver for FailingResolver {
        async fn resolve(
            &self,
            _proof: &ActionProof,
            _challenge_reason: &str,
        ) -> anyhow::Result<Ruling> {
            anyhow::bail!("judge node unreachable")
        }
    }

    async fn manager(
        resolver: Arc<dyn DisputeResolver>,
    ) -> (Arc<ProofStore>, Arc<AgentRegistry>, Arc<RewardLedger>, DisputeManager) {
        let store = Arc::new(ProofStore::open(Arc::new(MemorySnapshots::new())).await);
        let registry = Arc::new(AgentRegistry::with_seed());
        let ledger = Arc::new(RewardLedger::new());
        let rewards = Arc::new(RewardEngine::new(
            registry.clone(),
            ledger.clone(),
            Arc::new(FixedIdentity),
        ));
        let manager = DisputeManager::new(store.clone(), resolver, registry.clone(), rewards);
        (store, registry, ledger, manager)
    }

    #[tokio::test]
    async fn test_empty_reason_rejected_without_side_effects() {
        let (store, _registry, _ledger, manager) =
            manager(Arc::new(FixedResolver(Verdict::Upheld))).await;
        let id = ProofId::new(SEED_PROOF_ID);

        let err = manager.challenge(&id, "   ").await.unwrap_err();
        assert!(matches!(err, DisputeError::EmptyReason));

        let proof = store.get(&id).await.unwrap();
        assert!(!proof.is_disputed);
        assert_eq!(proof.dispute_status, DisputeStatus::None);
    }

    #[tokio::test]
    async fn test_upheld_flow() {
        let (store, registry, _ledger, manager) =
            manager(Arc::new(FixedResolver(Verdict::Upheld))).await;
        let id = ProofId::new(SEED_PROOF_ID);

        let before = registry
            .get(&aether_types::AgentId::new("agent-alpha-01"))
            .await
            .unwrap();

        let resolved = manager.challenge(&id, "insufficient evidence").await.unwrap();
        assert_eq!(resolved.dispute_status, DisputeStatus::ResolvedUpheld);
        assert_eq!(resolved.challenge_reason.as_deref(), Some("insufficient evidence"));
        assert_eq!(resolved.trust_delta(), 5);

        let after = registry
            .get(&aether_types::AgentId::new("agent-alpha-01"))
            .await
            .unwrap();
        assert!(after.reputation_score > before.reputation_score);
        assert_eq!(after.disputes_lost, before.disputes_lost);

        let stored = store.get(&id).await.unwrap();
        assert!(stored.is_disputed);
    }

    #[tokio::test]
    async fn test_overturned_flow_settles_penalty() {
        let (_store, registry, ledger, manager) =
            manager(Arc::new(FixedResolver(Verdict::Overturned))).await;
        let id = ProofId::new(SEED_PROOF_ID);

        let resolved = manager.challenge(&id, "agent missed context").await.unwrap();
        assert_eq!(resolved.dispute_status, DisputeStatus::ResolvedOverturned);
        assert_eq!(resolved.trust_delta(), -15);

        let agent = registry
            .get(&aether_types::AgentId::new("agent-alpha-01"))
            .await
            .unwrap();
        assert_eq!(agent.disputes_lost, 3); // seeded at 2

        let log = ledger.all().await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, aether_economics::TransactionKind::Penalty);
    }

    #[tokio::test]
    async fn test_double_challenge_refused() {
        let (_store, _registry, _ledger, manager) =
            manager(Arc::new(FixedResolver(Verdict::Upheld))).await;
        let id = ProofId::new(SEED_PROOF_ID);

        manager.challenge(&id, "first").await.unwrap();
        let err = manager.challenge(&id, "second").await.unwrap_err();
        assert!(matches!(err, DisputeError::AlreadyChallenged { .. }));
    }

    #[tokio::test]
    async fn test_resolver_failure_leaves_open_and_retryable() {
        let (store, _registry, _ledger, manager) = manager(Arc::new(FailingResolver)).await;
        let id = ProofId::new(SEED_PROOF_ID);

        let err = manager.challenge(&id, "please recheck").await.unwrap_err();
        assert!(matches!(err, DisputeError::Resolver(_)));

        // Stuck open: disputed, no verdict.
        let stuck = store.get(&id).await.unwrap();
        assert!(stuck.is_disputed);
        assert_eq!(stuck.dispute_status, DisputeStatus::Open);
        assert!(stuck.judge_verdict.is_none());

        // A plain re-challenge is refused; retry is the explicit path.
        let err = manager.challenge(&id, "please recheck").await.unwrap_err();
        assert!(matches!(err, DisputeError::AlreadyChallenged { .. }));
    }
}
