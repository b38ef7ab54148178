use crate::amount::TokenAmount;
use aether_types::AgentId;
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentCategory {
    Moderation,
    Legal,
    Finance,
    Creative,
    Security,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceKind {
    Audit,
    Validation,
    Generation,
    Training,
}

/// A priced capability an agent sells on the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentService {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: TokenAmount,
    #[serde(rename = "type")]
    pub kind: ServiceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionBias {
    Analytical,
    Balanced,
    Creative,
}

/// Tunable behavior profile, rewritten wholesale by the strategy optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyProfile {
    pub risk_tolerance: u8,
    pub compliance_strictness: u8,
    pub creative_freedom: u8,
    pub decision_bias: DecisionBias,
}

/// One applied optimization, kept for the agent's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRevision {
    pub applied_at: DateTime<Utc>,
    pub previous_version: String,
    pub adjustments: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub id: AgentId,
    pub name: String,
    pub role: String,
    pub category: AgentCategory,
    pub reputation_score: f64,
    pub description: String,
    pub capabilities: Vec<String>,
    pub total_tasks: u64,
    pub disputes_lost: u64,
    pub price_per_call: TokenAmount,
    pub wallet_address: String,
    pub token_balance: TokenAmount,
    pub services: Vec<AgentService>,
    pub current_strategy: StrategyProfile,
    #[serde(default)]
    pub optimization_history: Vec<StrategyRevision>,
    pub version: String,
}

/// Mutable roster of marketplace agents.
///
/// The ledger core only ever credits balances and nudges reputation; the
/// richer fields (strategy, version, history) are mutated through the hooks
/// below on behalf of external collaborators.
pub struct AgentRegistry {
    agents: Arc<RwLock<Vec<AgentProfile>>>,
}

impl AgentRegistry {
    pub fn new(agents: Vec<AgentProfile>) -> Self {
        Self {
            agents: Arc::new(RwLock::new(agents)),
        }
    }

    pub fn with_seed() -> Self {
        Self::new(seed_agents())
    }

    pub async fn get(&self, id: &AgentId) -> Option<AgentProfile> {
        let agents = self.agents.read().await;
        agents.iter().find(|a| &a.id == id).cloned()
    }

    pub async fn all(&self) -> Vec<AgentProfile> {
        self.agents.read().await.clone()
    }

    /// Every agent except `id`; the cross-check swarm draws from this pool.
    pub async fn peers_of(&self, id: &AgentId) -> Vec<AgentProfile> {
        let agents = self.agents.read().await;
        agents.iter().filter(|a| &a.id != id).cloned().collect()
    }

    /// Credit an agent's balance. Balances in this economy are only ever
    /// credited; debits exist solely on the operator wallet.
    pub async fn credit(&self, id: &AgentId, amount: TokenAmount) -> Result<TokenAmount> {
        let mut agents = self.agents.write().await;
        let agent = agents
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| anyhow::anyhow!("unknown agent: {}", id))?;

        let before = agent.token_balance;
        agent.token_balance = match before.checked_add(amount) {
            Some(balance) => balance,
            None => bail!("balance overflow for {}", id),
        };

        info!(
            agent = %id,
            amount = amount.tokens(),
            balance_before = before.tokens(),
            balance_after = agent.token_balance.tokens(),
            "💰 Balance credited"
        );
        Ok(agent.token_balance)
    }

    /// Nudge reputation by a signed delta, clamped to the 0..=100 display
    /// range.
    pub async fn adjust_reputation(&self, id: &AgentId, delta: f64) -> Result<f64> {
        let mut agents = self.agents.write().await;
        let agent = agents
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| anyhow::anyhow!("unknown agent: {}", id))?;

        let before = agent.reputation_score;
        agent.reputation_score = (before + delta).clamp(0.0, 100.0);

        info!(
            agent = %id,
            delta = delta,
            reputation_before = before,
            reputation_after = agent.reputation_score,
            "📈 Reputation adjusted"
        );
        Ok(agent.reputation_score)
    }

    pub async fn record_dispute_loss(&self, id: &AgentId) -> Result<u64> {
        let mut agents = self.agents.write().await;
        let agent = agents
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| anyhow::anyhow!("unknown agent: {}", id))?;
        agent.disputes_lost += 1;
        Ok(agent.disputes_lost)
    }

    pub async fn record_task(&self, id: &AgentId) -> Result<u64> {
        let mut agents = self.agents.write().await;
        let agent = agents
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| anyhow::anyhow!("unknown agent: {}", id))?;
        agent.total_tasks += 1;
        Ok(agent.total_tasks)
    }

    /// Install a new strategy produced by the optimizer collaborator,
    /// appending the revision to the agent's history and bumping its
    /// version.
    pub async fn apply_strategy(
        &self,
        id: &AgentId,
        new_strategy: StrategyProfile,
        adjustments: Vec<String>,
        reasoning: String,
    ) -> Result<AgentProfile> {
        let mut agents = self.agents.write().await;
        let agent = agents
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| anyhow::anyhow!("unknown agent: {}", id))?;

        let previous_version = agent.version.clone();
        agent.optimization_history.push(StrategyRevision {
            applied_at: Utc::now(),
            previous_version: previous_version.clone(),
            adjustments,
            reasoning,
        });
        agent.current_strategy = new_strategy;
        agent.version = bump_version(&previous_version);

        info!(
            agent = %id,
            version_before = %previous_version,
            version_after = %agent.version,
            revisions = agent.optimization_history.len(),
            "🧠 Strategy reconfigured"
        );
        Ok(agent.clone())
    }

    /// Wholesale profile replacement, for callers that edited a copy.
    pub async fn update_profile(&self, profile: AgentProfile) -> Result<()> {
        let mut agents = self.agents.write().await;
        let slot = agents
            .iter_mut()
            .find(|a| a.id == profile.id)
            .ok_or_else(|| anyhow::anyhow!("unknown agent: {}", profile.id))?;
        *slot = profile;
        Ok(())
    }
}

fn bump_version(version: &str) -> String {
    let trimmed = version.trim_start_matches('v');
    let mut parts = trimmed.splitn(2, '.');
    let major: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(1);
    let minor: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    format!("v{}.{}", major, minor + 1)
}

/// The fixed marketplace roster.
pub fn seed_agents() -> Vec<AgentProfile> {
    vec![
        AgentProfile {
            id: AgentId::new("agent-alpha-01"),
            name: "Guardian Prime".to_string(),
            role: "Content Moderator".to_string(),
            category: AgentCategory::Moderation,
            reputation_score: 98.5,
            description:
                "High-speed content safety analysis for hate speech, violence, and policy violations."
                    .to_string(),
            capabilities: vec![
                "Text Analysis".to_string(),
                "Policy Enforcement".to_string(),
                "Safety Scoring".to_string(),
            ],
            total_tasks: 14520,
            disputes_lost: 2,
            price_per_call: TokenAmount::from_tokens(5),
            wallet_address: "0x71C...9A23".to_string(),
            token_balance: TokenAmount::from_tokens(4500),
            services: vec![
                AgentService {
                    id: "srv-1a".to_string(),
                    name: "Deep Audit".to_string(),
                    description: "Full historical content audit for compliance.".to_string(),
                    price: TokenAmount::from_tokens(50),
                    kind: ServiceKind::Audit,
                },
                AgentService {
                    id: "srv-1b".to_string(),
                    name: "Real-time Guard".to_string(),
                    description: "Stream monitoring for 1 hour.".to_string(),
                    price: TokenAmount::from_tokens(100),
                    kind: ServiceKind::Validation,
                },
            ],
            current_strategy: StrategyProfile {
                risk_tolerance: 10,
                compliance_strictness: 95,
                creative_freedom: 5,
                decision_bias: DecisionBias::Analytical,
            },
            optimization_history: vec![],
            version: "v1.0".to_string(),
        },
        AgentProfile {
            id: AgentId::new("agent-lex-99"),
            name: "LexMachina".to_string(),
            role: "Legal Analyst".to_string(),
            category: AgentCategory::Legal,
            reputation_score: 94.2,
            description:
                "Analyzes contracts for risky clauses, loop-holes, and compliance issues."
                    .to_string(),
            capabilities: vec![
                "Contract Review".to_string(),
                "Risk Assessment".to_string(),
                "Compliance Check".to_string(),
            ],
            total_tasks: 3205,
            disputes_lost: 15,
            price_per_call: TokenAmount::from_tokens(25),
            wallet_address: "0xB4F...221D".to_string(),
            token_balance: TokenAmount::from_tokens(1250),
            services: vec![
                AgentService {
                    id: "srv-2a".to_string(),
                    name: "Contract Validation".to_string(),
                    description: "Verify smart contract logic against legal prose.".to_string(),
                    price: TokenAmount::from_tokens(200),
                    kind: ServiceKind::Validation,
                },
                AgentService {
                    id: "srv-2b".to_string(),
                    name: "Liability Scan".to_string(),
                    description: "Identify potential litigation vectors.".to_string(),
                    price: TokenAmount::from_tokens(75),
                    kind: ServiceKind::Audit,
                },
            ],
            current_strategy: StrategyProfile {
                risk_tolerance: 40,
                compliance_strictness: 90,
                creative_freedom: 20,
                decision_bias: DecisionBias::Analytical,
            },
            optimization_history: vec![],
            version: "v2.4".to_string(),
        },
        AgentProfile {
            id: AgentId::new("agent-fin-flux"),
            name: "Flux Capital".to_string(),
            role: "Transaction Auditor".to_string(),
            category: AgentCategory::Finance,
            reputation_score: 99.1,
            description:
                "Real-time transaction auditing for fraud patterns and anomaly detection."
                    .to_string(),
            capabilities: vec![
                "Fraud Detection".to_string(),
                "Pattern Recognition".to_string(),
                "Ledger Audit".to_string(),
            ],
            total_tasks: 89000,
            disputes_lost: 0,
            price_per_call: TokenAmount::from_tokens(10),
            wallet_address: "0x11A...FF00".to_string(),
            token_balance: TokenAmount::from_tokens(89000),
            services: vec![
                AgentService {
                    id: "srv-3a".to_string(),
                    name: "Ledger Forensics".to_string(),
                    description: "Trace funds across 10 layers.".to_string(),
                    price: TokenAmount::from_tokens(500),
                    kind: ServiceKind::Audit,
                },
                AgentService {
                    id: "srv-3b".to_string(),
                    name: "Risk Scoring".to_string(),
                    description: "Predictive financial risk model generation.".to_string(),
                    price: TokenAmount::from_tokens(150),
                    kind: ServiceKind::Generation,
                },
            ],
            current_strategy: StrategyProfile {
                risk_tolerance: 25,
                compliance_strictness: 85,
                creative_freedom: 10,
                decision_bias: DecisionBias::Balanced,
            },
            optimization_history: vec![],
            version: "v3.1".to_string(),
        },
        AgentProfile {
            id: AgentId::new("agent-truth-seeker"),
            name: "Veritas Lens".to_string(),
            role: "Fact Checker".to_string(),
            category: AgentCategory::Security,
            reputation_score: 96.0,
            description:
                "Cross-references inputs against knowledge bases to verify factual accuracy."
                    .to_string(),
            capabilities: vec![
                "Fact Checking".to_string(),
                "Source Verification".to_string(),
                "Bias Detection".to_string(),
            ],
            total_tasks: 5600,
            disputes_lost: 12,
            price_per_call: TokenAmount::from_tokens(8),
            wallet_address: "0xD99...EE44".to_string(),
            token_balance: TokenAmount::from_tokens(3200),
            services: vec![
                AgentService {
                    id: "srv-4a".to_string(),
                    name: "Dataset Cleaning".to_string(),
                    description: "Remove hallucinations from training data.".to_string(),
                    price: TokenAmount::from_tokens(300),
                    kind: ServiceKind::Training,
                },
                AgentService {
                    id: "srv-4b".to_string(),
                    name: "Source Trace".to_string(),
                    description: "Verify origin of information.".to_string(),
                    price: TokenAmount::from_tokens(40),
                    kind: ServiceKind::Validation,
                },
            ],
            current_strategy: StrategyProfile {
                risk_tolerance: 15,
                compliance_strictness: 80,
                creative_freedom: 15,
                decision_bias: DecisionBias::Analytical,
            },
            optimization_history: vec![],
            version: "v1.2".to_string(),
        },
    ]
}
