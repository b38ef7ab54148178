use aether_economics::AgentProfile;
use aether_types::ActionProof;
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    Elevated,
    Critical,
}

impl RiskLevel {
    fn for_score(score: u8) -> Self {
        match score {
            0..=24 => Self::Low,
            25..=49 => Self::Moderate,
            50..=74 => Self::Elevated,
            _ => Self::Critical,
        }
    }
}

/// Display-only risk readout. Never mutates ledger state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
    pub rationale: String,
}

#[async_trait]
pub trait RiskAssessor: Send + Sync {
    async fn assess(
        &self,
        agent: &AgentProfile,
        history: &[ActionProof],
    ) -> anyhow::Result<RiskAssessment>;
}

/// Mock assessor: a disputed track record reads as risk, with some jitter.
pub struct MockRiskAssessor;

#[async_trait]
impl RiskAssessor for MockRiskAssessor {
    async fn assess(
        &self,
        agent: &AgentProfile,
        history: &[ActionProof],
    ) -> anyhow::Result<RiskAssessment> {
        let disputed = history
            .iter()
            .filter(|p| p.agent_id == agent.id && p.is_disputed)
            .count();
        let authored = history
            .iter()
            .filter(|p| p.agent_id == agent.id)
            .count()
            .max(1);

        let base = ((disputed as f64 / authored as f64) * 60.0) as u8;
        let jitter = rand::thread_rng().gen_range(0..=20);
        let score = (base + jitter).min(100);

        Ok(RiskAssessment {
            score,
            level: RiskLevel::for_score(score),
            rationale: format!(
                "{} of {} recent proofs disputed; reputation {:.1}.",
                disputed, authored, agent.reputation_score
            ),
        })
    }
}
