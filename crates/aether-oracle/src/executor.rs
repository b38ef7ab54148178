use aether_economics::{AgentCategory, AgentProfile};
use aether_types::{IdentityGenerator, VerificationResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Number of peer agents drawn into the cross-check swarm.
pub const SWARM_SIZE: usize = 2;

/// The full candidate-proof payload produced by one task run. The ledger
/// core stores all of it verbatim and validates none of it.
#[derive(Debug, Clone)]
pub struct TaskExecution {
    pub proof_id: String,
    pub action_output: String,
    pub reasoning: Vec<String>,
    pub explanation: Option<String>,
    pub cross_checks: Vec<VerificationResult>,
    pub ethical_evaluation: Option<serde_json::Value>,
    pub collaboration_trace: Option<serde_json::Value>,
    pub quantum_metadata: Option<serde_json::Value>,
    pub trust_score_delta: i64,
}

/// External task-execution collaborator. A failure here must admit nothing:
/// the caller only builds a proof from a returned `TaskExecution`.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(
        &self,
        agent: &AgentProfile,
        peers: &[AgentProfile],
        input: &str,
    ) -> Result<TaskExecution>;
}

/// Inline mock standing in for the generative-model API.
pub struct MockExecutor {
    identity: Arc<dyn IdentityGenerator>,
}

impl MockExecutor {
    pub fn new(identity: Arc<dyn IdentityGenerator>) -> Self {
        Self { identity }
    }

    fn output_for(agent: &AgentProfile, input: &str) -> (String, Vec<String>) {
        let excerpt: String = input.chars().take(40).collect();
        match agent.category {
            AgentCategory::Moderation => (
                "Flagged as policy violation".to_string(),
                vec![
                    format!("Payload \"{}\" matches restricted-content heuristics.", excerpt),
                    "Tone analysis indicates hostility above threshold.".to_string(),
                ],
            ),
            AgentCategory::Legal => (
                "Clause carries material liability exposure".to_string(),
                vec![
                    "Indemnification language is unbounded.".to_string(),
                    format!("Reviewed against precedent set referenced by \"{}\".", excerpt),
                ],
            ),
            AgentCategory::Finance => (
                "No anomalous transfer pattern detected".to_string(),
                vec![
                    "Amounts fall within counterparty profile.".to_string(),
                    "Velocity check within tolerance.".to_string(),
                ],
            ),
            AgentCategory::Creative => (
                "Draft generated and self-reviewed".to_string(),
                vec![format!("Composed response to \"{}\".", excerpt)],
            ),
            AgentCategory::Security => (
                "Claim verified against known sources".to_string(),
                vec![
                    "Two independent corroborating references found.".to_string(),
                    "No contradicting source located.".to_string(),
                ],
            ),
        }
    }
}

#[async_trait]
impl TaskExecutor for MockExecutor {
    async fn execute(
        &self,
        agent: &AgentProfile,
        peers: &[AgentProfile],
        input: &str,
    ) -> Result<TaskExecution> {
        let (action_output, reasoning) = Self::output_for(agent, input);

        let (cross_checks, agreements) = {
            let mut rng = rand::thread_rng();
            let swarm: Vec<&AgentProfile> =
                peers.choose_multiple(&mut rng, SWARM_SIZE).collect();

            let mut agreements = 0usize;
            let checks: Vec<VerificationResult> = swarm
                .iter()
                .map(|checker| {
                    let agreement = rng.gen_bool(0.8);
                    if agreement {
                        agreements += 1;
                    }
                    VerificationResult {
                        checker_agent_id: checker.id.clone(),
                        checker_agent_name: checker.name.clone(),
                        checker_role: checker.role.clone(),
                        agreement,
                        comment: if agreement {
                            "Concur with the stated decision.".to_string()
                        } else {
                            "Decision overlooks part of the input.".to_string()
                        },
                        timestamp: Some(Utc::now()),
                    }
                })
                .collect();
            (checks, agreements)
        };

        // Swarm consensus policy: unanimous +5, partial +2, rejected -5.
        let trust_score_delta = if cross_checks.is_empty() {
            0
        } else if agreements == cross_checks.len() {
            5
        } else if agreements > 0 {
            2
        } else {
            -5
        };

        let ethical_evaluation = {
            let mut rng = rand::thread_rng();
            Some(json!({
                "complianceScore": rng.gen_range(70..=100),
                "flags": [],
            }))
        };
        let quantum_metadata = {
            let mut rng = rand::thread_rng();
            rng.gen_bool(0.5).then(|| {
                json!({
                    "latticeSignature": self.identity.tx_hash(),
                    "entanglementScore": rng.gen_range(0..100),
                })
            })
        };

        let execution = TaskExecution {
            proof_id: self.identity.proof_fingerprint(),
            action_output,
            reasoning,
            explanation: None,
            cross_checks,
            ethical_evaluation,
            collaboration_trace: None,
            quantum_metadata,
            trust_score_delta,
        };

        debug!(
            agent = %agent.id,
            swarm = execution.cross_checks.len(),
            agreements,
            delta = execution.trust_score_delta,
            "Task executed"
        );
        Ok(execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::RandomIdentity;
    use aether_economics::registry::seed_agents;

    #[tokio::test]
    async fn test_execution_shape() {
        let executor = MockExecutor::new(Arc::new(RandomIdentity));
        let agents = seed_agents();
        let (agent, peers) = agents.split_first().unwrap();

        let execution = executor
            .execute(agent, peers, "please review this comment thread")
            .await
            .unwrap();

        assert!(execution.proof_id.starts_with("0x"));
        assert_eq!(execution.cross_checks.len(), SWARM_SIZE);
        assert!(!execution.reasoning.is_empty());
        assert!([5, 2, -5].contains(&execution.trust_score_delta));
        // The swarm never includes the executing agent.
        assert!(execution
            .cross_checks
            .iter()
            .all(|c| c.checker_agent_id != agent.id));
    }

    #[tokio::test]
    async fn test_delta_matches_agreement_count() {
        let executor = MockExecutor::new(Arc::new(RandomIdentity));
        let agents = seed_agents();
        let (agent, peers) = agents.split_first().unwrap();

        for _ in 0..20 {
            let execution = executor.execute(agent, peers, "spot check").await.unwrap();
            let agreements = execution
                .cross_checks
                .iter()
                .filter(|c| c.agreement)
                .count();
            let expected = if agreements == execution.cross_checks.len() {
                5
            } else if agreements > 0 {
                2
            } else {
                -5
            };
            assert_eq!(execution.trust_score_delta, expected);
        }
    }
}
