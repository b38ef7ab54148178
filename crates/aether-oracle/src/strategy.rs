use aether_economics::{AgentProfile, DecisionBias, StrategyProfile};
use aether_types::ActionProof;
use async_trait::async_trait;
use rand::Rng;

/// Replacement strategy proposed by the optimizer collaborator, applied to
/// the registry through its update hook. Never touches the proof store.
#[derive(Debug, Clone)]
pub struct StrategyUpdate {
    pub new_strategy: StrategyProfile,
    pub adjustments: Vec<String>,
    pub reasoning: String,
}

#[async_trait]
pub trait StrategyOptimizer: Send + Sync {
    async fn optimize(
        &self,
        agent: &AgentProfile,
        history: &[ActionProof],
    ) -> anyhow::Result<StrategyUpdate>;
}

/// Mock optimizer: overturned disputes push the profile toward caution,
/// a clean streak loosens it slightly.
pub struct MockStrategyOptimizer;

fn nudge(value: u8, delta: i16) -> u8 {
    (value as i16 + delta).clamp(0, 100) as u8
}

#[async_trait]
impl StrategyOptimizer for MockStrategyOptimizer {
    async fn optimize(
        &self,
        agent: &AgentProfile,
        history: &[ActionProof],
    ) -> anyhow::Result<StrategyUpdate> {
        let overturned = history
            .iter()
            .filter(|p| {
                p.agent_id == agent.id
                    && p.dispute_status == aether_types::DisputeStatus::ResolvedOverturned
            })
            .count();

        let current = &agent.current_strategy;
        let mut adjustments = Vec::new();

        let (risk_delta, strict_delta) = if overturned > 0 {
            adjustments.push(format!(
                "Tightened compliance after {} overturned decision(s).",
                overturned
            ));
            (-10, 5)
        } else {
            adjustments.push("Loosened risk posture on a clean dispute record.".to_string());
            (5, -2)
        };

        let decision_bias = if rand::thread_rng().gen_bool(0.2) {
            adjustments.push("Rebalanced decision bias.".to_string());
            match current.decision_bias {
                DecisionBias::Analytical => DecisionBias::Balanced,
                DecisionBias::Balanced => DecisionBias::Analytical,
                DecisionBias::Creative => DecisionBias::Balanced,
            }
        } else {
            current.decision_bias
        };

        Ok(StrategyUpdate {
            new_strategy: StrategyProfile {
                risk_tolerance: nudge(current.risk_tolerance, risk_delta),
                compliance_strictness: nudge(current.compliance_strictness, strict_delta),
                creative_freedom: current.creative_freedom,
                decision_bias,
            },
            adjustments,
            reasoning: format!(
                "Derived from {} recorded proofs for {}.",
                history.len(),
                agent.name
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_economics::registry::seed_agents;

    #[test]
    fn test_nudge_clamps() {
        assert_eq!(nudge(95, 10), 100);
        assert_eq!(nudge(5, -10), 0);
        assert_eq!(nudge(50, 5), 55);
    }

    #[tokio::test]
    async fn test_clean_record_loosens_risk() {
        let agent = seed_agents().remove(0);
        let update = MockStrategyOptimizer.optimize(&agent, &[]).await.unwrap();
        assert!(update.new_strategy.risk_tolerance >= agent.current_strategy.risk_tolerance);
        assert!(!update.adjustments.is_empty());
    }
}
