use aether_disputes::{DisputeResolver, Ruling};
use aether_types::{ActionProof, Verdict};
use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

/// Inline mock of the supreme-judge collaborator. The verdict leans on the
/// recorded swarm consensus: a unanimously cross-checked proof is hard to
/// overturn, a swarm-rejected one is hard to defend.
pub struct MockJudge;

#[async_trait]
impl DisputeResolver for MockJudge {
    async fn resolve(&self, proof: &ActionProof, challenge_reason: &str) -> anyhow::Result<Ruling> {
        let total = proof.cross_checks.len();
        let agreements = proof.cross_checks.iter().filter(|c| c.agreement).count();

        let uphold_probability = if total == 0 {
            0.5
        } else if agreements == total {
            0.75
        } else if agreements == 0 {
            0.2
        } else {
            0.45
        };

        let upheld = rand::thread_rng().gen_bool(uphold_probability);
        debug!(
            proof = %proof.proof_id.short(),
            agreements,
            swarm = total,
            upheld,
            "Dispute adjudicated"
        );

        if upheld {
            Ok(Ruling {
                verdict: Verdict::Upheld,
                comment: format!(
                    "The challenger's argument (\"{}\") does not invalidate the recorded \
                     decision; the swarm consensus stands.",
                    truncate(challenge_reason, 80)
                ),
            })
        } else {
            Ok(Ruling {
                verdict: Verdict::Overturned,
                comment: format!(
                    "The challenge (\"{}\") identifies a substantive flaw the agent missed; \
                     the decision is set aside.",
                    truncate(challenge_reason, 80)
                ),
            })
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max).collect();
        format!("{}...", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_types::{AgentId, DisputeStatus, ProofId};
    use chrono::Utc;

    fn proof() -> ActionProof {
        ActionProof {
            proof_id: ProofId::new("0xjudged"),
            timestamp: Utc::now(),
            agent_id: AgentId::new("agent-alpha-01"),
            agent_name: "Guardian Prime".to_string(),
            input_snippet: "input".to_string(),
            action_output: "output".to_string(),
            reasoning: vec![],
            explanation: None,
            cross_checks: vec![],
            ethical_evaluation: None,
            collaboration_trace: None,
            quantum_metadata: None,
            security_protocol_version: None,
            is_disputed: true,
            dispute_status: DisputeStatus::Open,
            judge_verdict: None,
            challenge_reason: None,
            trust_score_delta: Some(5),
            block_height: None,
        }
    }

    #[tokio::test]
    async fn test_ruling_carries_reason_excerpt() {
        let ruling = MockJudge
            .resolve(&proof(), "the cited policy section does not exist")
            .await
            .unwrap();
        assert!(ruling.comment.contains("the cited policy section"));
        assert!(matches!(
            ruling.verdict,
            Verdict::Upheld | Verdict::Overturned
        ));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 80), "short");
        let long = "x".repeat(100);
        assert_eq!(truncate(&long, 80).chars().count(), 83);
    }
}
