use crate::seed::seed_proofs;
use crate::snapshot::SnapshotStore;
use aether_types::{
    ActionProof, AgentId, DisputeStatus, LedgerError, ProofId, Result, Verdict,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

const EVENT_BUFFER: usize = 256;

/// State changes announced by the store. Slow subscribers lose old events
/// rather than blocking mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LedgerEvent {
    ProofAdmitted {
        proof_id: ProofId,
        agent_id: AgentId,
        timestamp: DateTime<Utc>,
    },
    DisputeOpened {
        proof_id: ProofId,
        timestamp: DateTime<Utc>,
    },
    DisputeResolved {
        proof_id: ProofId,
        status: DisputeStatus,
        timestamp: DateTime<Utc>,
    },
    StoreReset {
        proofs: usize,
        timestamp: DateTime<Utc>,
    },
}

/// Durable, ordered record of all proofs; the single source of truth for
/// dispute state.
///
/// Records are kept newest first — the consensus-stream view depends on that
/// order, so it is a contract, not an implementation detail. Every mutation
/// serializes the full list into the snapshot backend before the write lock
/// is released, which makes each admission or verdict an atomic
/// read-modify-write-persist step.
pub struct ProofStore {
    proofs: RwLock<Vec<ActionProof>>,
    snapshots: Arc<dyn SnapshotStore>,
    events: broadcast::Sender<LedgerEvent>,
}

impl ProofStore {
    /// Load the persisted snapshot, falling back to the seed list when the
    /// backend has nothing or holds something unreadable. Corruption is
    /// swallowed by design: a broken snapshot must never take the session
    /// down.
    pub async fn open(snapshots: Arc<dyn SnapshotStore>) -> Self {
        let proofs = match snapshots.read().await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ActionProof>>(&raw) {
                Ok(proofs) => {
                    info!(proofs = proofs.len(), "💾 Proof snapshot loaded");
                    proofs
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable proof snapshot, reseeding");
                    seed_proofs()
                }
            },
            Ok(None) => {
                info!("🌱 No proof snapshot found, starting from seed");
                seed_proofs()
            }
            Err(e) => {
                warn!(error = %e, "Snapshot backend unavailable, starting from seed");
                seed_proofs()
            }
        };

        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            proofs: RwLock::new(proofs),
            snapshots,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    pub async fn all(&self) -> Vec<ActionProof> {
        self.proofs.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.proofs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.proofs.read().await.is_empty()
    }

    pub async fn get(&self, id: &ProofId) -> Result<ActionProof> {
        let proofs = self.proofs.read().await;
        proofs
            .iter()
            .find(|p| &p.proof_id == id)
            .cloned()
            .ok_or_else(|| LedgerError::ProofNotFound(id.to_string()))
    }

    /// First proof (in store order) whose fingerprint equals `text` or whose
    /// input snippet contains it.
    pub async fn find(&self, text: &str) -> Option<ActionProof> {
        let proofs = self.proofs.read().await;
        proofs
            .iter()
            .find(|p| p.proof_id.as_str() == text || p.input_snippet.contains(text))
            .cloned()
    }

    /// Admit a new proof at the front of the store. Rejects a fingerprint
    /// collision outright; nothing is persisted on rejection.
    pub async fn admit(&self, proof: ActionProof) -> Result<()> {
        let mut proofs = self.proofs.write().await;

        if proofs.iter().any(|p| p.proof_id == proof.proof_id) {
            return Err(LedgerError::DuplicateProof {
                id: proof.proof_id.to_string(),
            });
        }

        let proof_id = proof.proof_id.clone();
        let agent_id = proof.agent_id.clone();
        proofs.insert(0, proof);
        self.persist(&proofs).await?;

        info!(
            proof = %proof_id.short(),
            agent = %agent_id,
            total = proofs.len(),
            "📦 Proof admitted"
        );
        let _ = self.events.send(LedgerEvent::ProofAdmitted {
            proof_id,
            agent_id,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Flag a proof as disputed, promoting its status `None -> Open`.
    /// Idempotent: re-marking an already disputed proof changes nothing.
    pub async fn mark_disputed(&self, id: &ProofId) -> Result<()> {
        let mut proofs = self.proofs.write().await;
        let proof = proofs
            .iter_mut()
            .find(|p| &p.proof_id == id)
            .ok_or_else(|| LedgerError::ProofNotFound(id.to_string()))?;

        let first_open = !proof.is_disputed;
        proof.is_disputed = true;
        if proof.dispute_status == DisputeStatus::None {
            proof.dispute_status = DisputeStatus::Open;
        }
        self.persist(&proofs).await?;

        if first_open {
            info!(proof = %id.short(), "⚖️ Dispute opened");
            let _ = self.events.send(LedgerEvent::DisputeOpened {
                proof_id: id.clone(),
                timestamp: Utc::now(),
            });
        } else {
            debug!(proof = %id.short(), "Proof already disputed");
        }
        Ok(())
    }

    /// Apply a resolver verdict: sets the terminal status, the judicial
    /// comment and challenge reason, and folds the verdict's trust delta
    /// into the proof's cumulative score. A resolved proof is terminal and
    /// refuses further verdicts.
    pub async fn apply_verdict(
        &self,
        id: &ProofId,
        verdict: Verdict,
        comment: &str,
        reason: &str,
    ) -> Result<ActionProof> {
        let mut proofs = self.proofs.write().await;
        let proof = proofs
            .iter_mut()
            .find(|p| &p.proof_id == id)
            .ok_or_else(|| LedgerError::ProofNotFound(id.to_string()))?;

        if proof.dispute_status.is_resolved() {
            return Err(LedgerError::DisputeClosed {
                id: id.to_string(),
                status: proof.dispute_status,
            });
        }

        proof.is_disputed = true;
        proof.dispute_status = verdict.resolved_status();
        proof.judge_verdict = Some(comment.to_string());
        proof.challenge_reason = Some(reason.to_string());
        proof.trust_score_delta = Some(proof.trust_delta() + verdict.trust_delta());

        let updated = proof.clone();
        self.persist(&proofs).await?;

        let emoji = match verdict {
            Verdict::Upheld => "🛡️",
            Verdict::Overturned => "⚔️",
        };
        info!(
            proof = %id.short(),
            verdict = %verdict,
            trust_delta = updated.trust_delta(),
            "{} Verdict applied",
            emoji
        );
        let _ = self.events.send(LedgerEvent::DisputeResolved {
            proof_id: id.clone(),
            status: updated.dispute_status,
            timestamp: Utc::now(),
        });
        Ok(updated)
    }

    /// Destructive operator action: drop everything, restore the seed list,
    /// and clear the persisted snapshot. Confirmation is the calling
    /// layer's job.
    pub async fn reset_to_seed(&self) -> Result<Vec<ActionProof>> {
        let mut proofs = self.proofs.write().await;
        *proofs = seed_proofs();
        self.snapshots.clear().await?;

        info!(proofs = proofs.len(), "🧹 Store reset to seed");
        let _ = self.events.send(LedgerEvent::StoreReset {
            proofs: proofs.len(),
            timestamp: Utc::now(),
        });
        Ok(proofs.clone())
    }

    async fn persist(&self, proofs: &[ActionProof]) -> Result<()> {
        let payload = serde_json::to_string(proofs)?;
        self.snapshots.write(&payload).await
    }
}
