use crate::amount::TokenAmount;
use crate::ledger::RewardLedger;
use crate::registry::AgentRegistry;
use crate::transaction::{TransactionKind, TransactionRecord, TransactionStatus, NETWORK_MINT};
use aether_types::{ActionProof, IdentityGenerator, Verdict};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// The mining-reward formula: a proof admitted with a positive trust delta
/// mints `2d + 10` AE for its agent. Fixed protocol policy; every display of
/// a "reward minted" figure re-derives it from the proof's current delta
/// through this function rather than caching it.
pub fn reward_for_delta(delta: i64) -> Option<TokenAmount> {
    if delta > 0 {
        Some(TokenAmount::from_tokens(delta as u64 * 2 + 10))
    } else {
        None
    }
}

/// Computes and records the token-economic consequences of ledger events.
/// The sole path by which admissions and verdicts touch balances and the
/// transaction log.
pub struct RewardEngine {
    registry: Arc<AgentRegistry>,
    ledger: Arc<RewardLedger>,
    identity: Arc<dyn IdentityGenerator>,
}

impl RewardEngine {
    pub fn new(
        registry: Arc<AgentRegistry>,
        ledger: Arc<RewardLedger>,
        identity: Arc<dyn IdentityGenerator>,
    ) -> Self {
        Self {
            registry,
            ledger,
            identity,
        }
    }

    /// Mining reward on proof admission. No-op for proofs whose trust delta
    /// is zero or negative.
    pub async fn mining_reward(&self, proof: &ActionProof) -> Result<Option<TransactionRecord>> {
        let reward = match reward_for_delta(proof.trust_delta()) {
            Some(reward) => reward,
            None => return Ok(None),
        };

        self.registry.credit(&proof.agent_id, reward).await?;

        let tx = TransactionRecord {
            id: self.identity.reward_id(),
            from: NETWORK_MINT.to_string(),
            to: proof.agent_id.to_string(),
            amount: reward,
            kind: TransactionKind::TrustReward,
            service_name: None,
            timestamp: Utc::now(),
            status: TransactionStatus::Confirmed,
            hash: self.identity.tx_hash(),
        };
        self.ledger.record(tx.clone()).await;

        info!(
            proof = %proof.proof_id.short(),
            agent = %proof.agent_id,
            reward = reward.tokens(),
            "💎 Trust reward minted"
        );
        Ok(Some(tx))
    }

    /// Ledger consequence of an applied verdict. An overturned proof leaves
    /// a penalty record naming the agent; an upheld one appends nothing (the
    /// trust-delta increment already lives on the proof).
    pub async fn dispute_settlement(
        &self,
        proof: &ActionProof,
        verdict: Verdict,
    ) -> Result<Option<TransactionRecord>> {
        if verdict != Verdict::Overturned {
            return Ok(None);
        }

        let magnitude = TokenAmount::from_tokens(verdict.trust_delta().unsigned_abs());
        let tx = TransactionRecord {
            id: self.identity.reward_id(),
            from: proof.agent_id.to_string(),
            to: NETWORK_MINT.to_string(),
            amount: magnitude,
            kind: TransactionKind::Penalty,
            service_name: None,
            timestamp: Utc::now(),
            status: TransactionStatus::Confirmed,
            hash: self.identity.tx_hash(),
        };
        self.ledger.record(tx.clone()).await;

        info!(
            proof = %proof.proof_id.short(),
            agent = %proof.agent_id,
            magnitude = magnitude.tokens(),
            "⚔️ Dispute penalty recorded"
        );
        Ok(Some(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_types::{AgentId, DisputeStatus, ProofId};

    struct FixedIdentity;

    impl IdentityGenerator for FixedIdentity {
        fn proof_fingerprint(&self) -> String {
            "0xfixed".to_string()
        }
        fn tx_hash(&self) -> String {
            "0xhash".to_string()
        }
        fn reward_id(&self) -> String {
            "reward-0".to_string()
        }
        fn block_height(&self) -> u64 {
            1
        }
    }

    fn proof_with_delta(delta: i64) -> ActionProof {
        ActionProof {
            proof_id: ProofId::new("0xabc"),
            timestamp: Utc::now(),
            agent_id: AgentId::new("agent-alpha-01"),
            agent_name: "Guardian Prime".to_string(),
            input_snippet: String::new(),
            action_output: String::new(),
            reasoning: vec![],
            explanation: None,
            cross_checks: vec![],
            ethical_evaluation: None,
            collaboration_trace: None,
            quantum_metadata: None,
            security_protocol_version: None,
            is_disputed: false,
            dispute_status: DisputeStatus::None,
            judge_verdict: None,
            challenge_reason: None,
            trust_score_delta: Some(delta),
            block_height: None,
        }
    }

    fn engine() -> (Arc<AgentRegistry>, Arc<RewardLedger>, RewardEngine) {
        let registry = Arc::new(AgentRegistry::with_seed());
        let ledger = Arc::new(RewardLedger::new());
        let engine = RewardEngine::new(registry.clone(), ledger.clone(), Arc::new(FixedIdentity));
        (registry, ledger, engine)
    }

    #[test]
    fn test_reward_formula() {
        assert_eq!(reward_for_delta(5), Some(TokenAmount::from_tokens(20)));
        assert_eq!(reward_for_delta(2), Some(TokenAmount::from_tokens(14)));
        assert_eq!(reward_for_delta(0), None);
        assert_eq!(reward_for_delta(-5), None);
    }

    #[tokio::test]
    async fn test_mining_reward_credits_and_records() {
        let (registry, ledger, engine) = engine();
        let id = AgentId::new("agent-alpha-01");

        let tx = engine
            .mining_reward(&proof_with_delta(5))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tx.amount, TokenAmount::from_tokens(20));
        assert_eq!(tx.from, NETWORK_MINT);
        assert_eq!(tx.kind, TransactionKind::TrustReward);

        // Seed balance 4500 + 20.
        let agent = registry.get(&id).await.unwrap();
        assert_eq!(agent.token_balance, TokenAmount::from_tokens(4520));
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_no_reward_for_nonpositive_delta() {
        let (registry, ledger, engine) = engine();
        let id = AgentId::new("agent-alpha-01");

        assert!(engine
            .mining_reward(&proof_with_delta(-5))
            .await
            .unwrap()
            .is_none());
        assert!(engine
            .mining_reward(&proof_with_delta(0))
            .await
            .unwrap()
            .is_none());

        let agent = registry.get(&id).await.unwrap();
        assert_eq!(agent.token_balance, TokenAmount::from_tokens(4500));
        assert_eq!(ledger.len().await, 0);
    }

    #[tokio::test]
    async fn test_settlement_only_on_overturned() {
        let (_registry, ledger, engine) = engine();
        let proof = proof_with_delta(5);

        assert!(engine
            .dispute_settlement(&proof, Verdict::Upheld)
            .await
            .unwrap()
            .is_none());
        assert_eq!(ledger.len().await, 0);

        let tx = engine
            .dispute_settlement(&proof, Verdict::Overturned)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tx.kind, TransactionKind::Penalty);
        assert_eq!(tx.amount, TokenAmount::from_tokens(15));
        assert_eq!(tx.to, NETWORK_MINT);
        assert_eq!(ledger.len().await, 1);
    }
}
