use aether_disputes::{DisputeError, DisputeManager, DisputeResolver, Ruling};
use aether_economics::{AgentRegistry, RewardEngine, RewardLedger};
use aether_ledger::{MemorySnapshots, ProofStore, SEED_PROOF_ID};
use aether_types::{ActionProof, AgentId, DisputeStatus, IdentityGenerator, ProofId, Verdict};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct FixedIdentity;

impl IdentityGenerator for FixedIdentity {
    fn proof_fingerprint(&self) -> String {
        "0xfp".to_string()
    }
    fn tx_hash(&self) -> String {
        "0xtx".to_string()
    }
    fn reward_id(&self) -> String {
        "reward-i".to_string()
    }
    fn block_height(&self) -> u64 {
        0
    }
}

/// Fails the first `failures` calls, then rules as configured.
struct FlakyResolver {
    failures: AtomicUsize,
    verdict: Verdict,
}

#[async_trait]
impl DisputeResolver for FlakyResolver {
    async fn resolve(&self, _proof: &ActionProof, _reason: &str) -> anyhow::Result<Ruling> {
        if self.failures.load(Ordering::SeqCst) > 0 {
            self.failures.fetch_sub(1, Ordering::SeqCst);
            anyhow::bail!("judge node timeout");
        }
        Ok(Ruling {
            verdict: self.verdict,
            comment: "The original decision was well supported.".to_string(),
        })
    }
}

struct UpholdResolver;

#[async_trait]
impl DisputeResolver for UpholdResolver {
    async fn resolve(&self, _proof: &ActionProof, _reason: &str) -> anyhow::Result<Ruling> {
        Ok(Ruling {
            verdict: Verdict::Upheld,
            comment: "The challenger's argument does not invalidate the result.".to_string(),
        })
    }
}

async fn harness(
    resolver: Arc<dyn DisputeResolver>,
) -> (Arc<ProofStore>, Arc<AgentRegistry>, DisputeManager) {
    let store = Arc::new(ProofStore::open(Arc::new(MemorySnapshots::new())).await);
    let registry = Arc::new(AgentRegistry::with_seed());
    let ledger = Arc::new(RewardLedger::new());
    let rewards = Arc::new(RewardEngine::new(
        registry.clone(),
        ledger,
        Arc::new(FixedIdentity),
    ));
    let manager = DisputeManager::new(store.clone(), resolver, registry.clone(), rewards);
    (store, registry, manager)
}

#[tokio::test]
async fn seeded_proof_challenge_scenario() {
    // Seed store holds one undisputed proof. Challenging it with
    // "insufficient evidence" marks it disputed immediately; the mocked
    // upheld ruling then lands Resolved_Upheld with trust +5.
    let (store, _registry, manager) = harness(Arc::new(UpholdResolver)).await;
    let id = ProofId::new(SEED_PROOF_ID);

    let seeded = store.get(&id).await.unwrap();
    assert!(!seeded.is_disputed);
    assert_eq!(seeded.trust_delta(), 0);

    let resolved = manager
        .challenge(&id, "insufficient evidence")
        .await
        .unwrap();

    assert_eq!(resolved.dispute_status, DisputeStatus::ResolvedUpheld);
    assert!(resolved.is_disputed);
    assert_eq!(resolved.trust_delta(), 5);
    assert_eq!(
        resolved.challenge_reason.as_deref(),
        Some("insufficient evidence")
    );
    assert!(resolved.judge_verdict.is_some());
}

#[tokio::test]
async fn stuck_open_dispute_recovers_via_retry() {
    let resolver = Arc::new(FlakyResolver {
        failures: AtomicUsize::new(1),
        verdict: Verdict::Overturned,
    });
    let (store, registry, manager) = harness(resolver).await;
    let id = ProofId::new(SEED_PROOF_ID);

    // First attempt: resolver down, proof stuck open.
    let err = manager.challenge(&id, "agent ignored context").await.unwrap_err();
    assert!(matches!(err, DisputeError::Resolver(_)));
    let stuck = store.get(&id).await.unwrap();
    assert_eq!(stuck.dispute_status, DisputeStatus::Open);

    // Explicit retry completes the machine.
    let resolved = manager
        .retry_challenge(&id, "agent ignored context")
        .await
        .unwrap();
    assert_eq!(resolved.dispute_status, DisputeStatus::ResolvedOverturned);
    assert_eq!(resolved.trust_delta(), -15);

    let agent = registry.get(&AgentId::new("agent-alpha-01")).await.unwrap();
    assert_eq!(agent.disputes_lost, 3);

    // Retry on a resolved proof is refused: resolution is terminal.
    let err = manager
        .retry_challenge(&id, "one more look")
        .await
        .unwrap_err();
    assert!(matches!(err, DisputeError::AlreadyChallenged { .. }));
}
