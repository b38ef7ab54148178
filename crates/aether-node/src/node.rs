use crate::config::NodeConfig;
use crate::events::{EventBus, NodeEvent};
use crate::telemetry::NetworkTelemetry;
use aether_disputes::{DisputeError, DisputeManager, DisputeResolver};
use aether_economics::{
    AgentProfile, AgentRegistry, MarketError, RewardEngine, RewardLedger, ServiceMarket,
    TokenAmount, TransactionAuthorizer, TransactionRecord, UserWallet,
};
use aether_ledger::{FileSnapshots, ProofStore, SnapshotStore};
use aether_oracle::{
    MockAuthorizer, MockExecutor, MockJudge, MockRiskAssessor, MockSentinel,
    MockStrategyOptimizer, RandomIdentity, RiskAssessment, RiskAssessor, SecurityMonitor,
    SecurityProtocol, StrategyOptimizer, TaskExecutor,
};
use aether_types::{ActionProof, AgentId, IdentityGenerator, ProofId};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Every external seam the node consumes, bundled so tests can swap any of
/// them for deterministic stand-ins.
pub struct Collaborators {
    pub identity: Arc<dyn IdentityGenerator>,
    pub executor: Arc<dyn TaskExecutor>,
    pub resolver: Arc<dyn DisputeResolver>,
    pub authorizer: Arc<dyn TransactionAuthorizer>,
    pub risk: Arc<dyn RiskAssessor>,
    pub optimizer: Arc<dyn StrategyOptimizer>,
    pub sentinel: Arc<dyn SecurityMonitor>,
}

impl Collaborators {
    /// The inline random mocks used when no real collaborator is wired.
    pub fn mock() -> Self {
        let identity: Arc<dyn IdentityGenerator> = Arc::new(RandomIdentity);
        Self {
            executor: Arc::new(MockExecutor::new(identity.clone())),
            resolver: Arc::new(MockJudge),
            authorizer: Arc::new(MockAuthorizer::new(identity.clone())),
            risk: Arc::new(MockRiskAssessor),
            optimizer: Arc::new(MockStrategyOptimizer),
            sentinel: Arc::new(MockSentinel),
            identity,
        }
    }
}

/// Wires the proof store, agent registry, reward economy and dispute driver
/// together and runs the session's periodic loop.
pub struct AetherNode {
    config: NodeConfig,
    store: Arc<ProofStore>,
    registry: Arc<AgentRegistry>,
    reward_ledger: Arc<RewardLedger>,
    rewards: Arc<RewardEngine>,
    wallet: Arc<UserWallet>,
    market: ServiceMarket,
    disputes: DisputeManager,
    collaborators: Collaborators,
    security: RwLock<SecurityProtocol>,
    telemetry: NetworkTelemetry,
    events: EventBus,
}

impl AetherNode {
    pub async fn new(config: NodeConfig) -> Result<Self> {
        let snapshots: Arc<dyn SnapshotStore> =
            Arc::new(FileSnapshots::new(&config.node.data_dir));
        Self::with_collaborators(config, snapshots, Collaborators::mock()).await
    }

    pub async fn with_collaborators(
        config: NodeConfig,
        snapshots: Arc<dyn SnapshotStore>,
        collaborators: Collaborators,
    ) -> Result<Self> {
        let store = Arc::new(ProofStore::open(snapshots).await);
        let registry = Arc::new(AgentRegistry::with_seed());
        let reward_ledger = Arc::new(RewardLedger::new());
        let rewards = Arc::new(RewardEngine::new(
            registry.clone(),
            reward_ledger.clone(),
            collaborators.identity.clone(),
        ));
        let wallet = Arc::new(UserWallet::new(TokenAmount::from_tokens(
            config.wallet.airdrop,
        )));
        let market = ServiceMarket::new(
            registry.clone(),
            reward_ledger.clone(),
            wallet.clone(),
            collaborators.authorizer.clone(),
        );
        let disputes = DisputeManager::new(
            store.clone(),
            collaborators.resolver.clone(),
            registry.clone(),
            rewards.clone(),
        );

        info!(
            node = %config.node.name,
            data_dir = ?config.node.data_dir,
            proofs = store.len().await,
            airdrop = config.wallet.airdrop,
            "✅ Node initialized"
        );

        Ok(Self {
            config,
            store,
            registry,
            reward_ledger,
            rewards,
            wallet,
            market,
            disputes,
            collaborators,
            security: RwLock::new(SecurityProtocol::default()),
            telemetry: NetworkTelemetry::new(),
            events: EventBus::new(),
        })
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<NodeEvent> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &Arc<ProofStore> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub async fn proofs(&self) -> Vec<ActionProof> {
        self.store.all().await
    }

    pub async fn transactions(&self) -> Vec<TransactionRecord> {
        self.reward_ledger.all().await
    }

    pub async fn agents(&self) -> Vec<AgentProfile> {
        self.registry.all().await
    }

    pub async fn user_balance(&self) -> TokenAmount {
        self.wallet.balance().await
    }

    pub async fn security_protocol(&self) -> SecurityProtocol {
        self.security.read().await.clone()
    }

    /// Execute a task through an agent and admit the resulting proof.
    ///
    /// The executor is consulted first; if it fails, nothing is admitted and
    /// the store is exactly as it was. Only a fully formed execution becomes
    /// a proof, atomically, followed by the mining-reward settlement.
    pub async fn run_agent_task(&self, agent_id: &AgentId, input: &str) -> Result<ActionProof> {
        let input = input.trim();
        if input.is_empty() {
            bail!("task input must not be empty");
        }

        let agent = self
            .registry
            .get(agent_id)
            .await
            .with_context(|| format!("unknown agent: {agent_id}"))?;
        let peers = self.registry.peers_of(agent_id).await;

        let execution = self
            .collaborators
            .executor
            .execute(&agent, &peers, input)
            .await
            .context("agent execution failed")?;

        let proof = ActionProof {
            proof_id: ProofId::new(execution.proof_id),
            timestamp: Utc::now(),
            agent_id: agent.id.clone(),
            agent_name: agent.name.clone(),
            input_snippet: input.to_string(),
            action_output: execution.action_output,
            reasoning: execution.reasoning,
            explanation: execution.explanation,
            cross_checks: execution.cross_checks,
            ethical_evaluation: execution.ethical_evaluation,
            collaboration_trace: execution.collaboration_trace,
            quantum_metadata: execution.quantum_metadata,
            security_protocol_version: Some(self.security.read().await.version.clone()),
            is_disputed: false,
            dispute_status: Default::default(),
            judge_verdict: None,
            challenge_reason: None,
            trust_score_delta: Some(execution.trust_score_delta),
            block_height: Some(self.collaborators.identity.block_height()),
        };

        self.store.admit(proof.clone()).await?;
        let reward = self.rewards.mining_reward(&proof).await?;
        self.registry.record_task(agent_id).await?;

        self.events.emit(NodeEvent::ProofAdmitted {
            proof_id: proof.proof_id.to_string(),
            agent_id: agent_id.to_string(),
            reward: reward.map(|tx| tx.amount.tokens()),
            timestamp: Utc::now(),
        });
        Ok(proof)
    }

    /// Challenge a proof. The proof shows as disputed immediately; the
    /// verdict (or a stuck-open dispute, if the resolver fails) follows.
    pub async fn challenge(
        &self,
        proof_id: &ProofId,
        reason: &str,
    ) -> std::result::Result<ActionProof, DisputeError> {
        match self.disputes.challenge(proof_id, reason).await {
            Ok(resolved) => {
                self.events.emit(NodeEvent::DisputeResolved {
                    proof_id: proof_id.to_string(),
                    status: resolved.dispute_status,
                    timestamp: Utc::now(),
                });
                Ok(resolved)
            }
            Err(e) => {
                // A resolver failure still opened the dispute; observers
                // should see the stuck-open state.
                if matches!(e, DisputeError::Resolver(_)) {
                    self.events.emit(NodeEvent::DisputeOpened {
                        proof_id: proof_id.to_string(),
                        timestamp: Utc::now(),
                    });
                }
                Err(e)
            }
        }
    }

    /// Retry a dispute stuck open after a resolver failure.
    pub async fn retry_challenge(
        &self,
        proof_id: &ProofId,
        reason: &str,
    ) -> std::result::Result<ActionProof, DisputeError> {
        let resolved = self.disputes.retry_challenge(proof_id, reason).await?;
        self.events.emit(NodeEvent::DisputeResolved {
            proof_id: proof_id.to_string(),
            status: resolved.dispute_status,
            timestamp: Utc::now(),
        });
        Ok(resolved)
    }

    pub async fn purchase(
        &self,
        agent_id: &AgentId,
        service_id: &str,
    ) -> std::result::Result<TransactionRecord, MarketError> {
        let tx = self.market.purchase(agent_id, service_id).await?;
        self.events.emit(NodeEvent::ServicePurchased {
            agent_id: agent_id.to_string(),
            service: tx.service_name.clone().unwrap_or_default(),
            price: tx.amount.tokens(),
            timestamp: Utc::now(),
        });
        Ok(tx)
    }

    /// Read-only risk readout for an agent; feeds a display widget and
    /// never mutates ledger state.
    pub async fn assess_risk(&self, agent_id: &AgentId) -> Result<RiskAssessment> {
        let agent = self
            .registry
            .get(agent_id)
            .await
            .with_context(|| format!("unknown agent: {agent_id}"))?;
        let history = self.store.all().await;
        self.collaborators.risk.assess(&agent, &history).await
    }

    /// Run the strategy optimizer and install its proposal through the
    /// registry's update hook.
    pub async fn optimize_agent(&self, agent_id: &AgentId) -> Result<AgentProfile> {
        let agent = self
            .registry
            .get(agent_id)
            .await
            .with_context(|| format!("unknown agent: {agent_id}"))?;
        let history = self.store.all().await;

        let update = self
            .collaborators
            .optimizer
            .optimize(&agent, &history)
            .await
            .context("strategy optimization failed")?;

        self.registry
            .apply_strategy(
                agent_id,
                update.new_strategy,
                update.adjustments,
                update.reasoning,
            )
            .await
    }

    /// Wipe the proof store back to seed. Destructive; callers confirm
    /// before invoking.
    pub async fn reset_ledger(&self) -> Result<Vec<ActionProof>> {
        let restored = self.store.reset_to_seed().await?;
        self.events.emit(NodeEvent::StoreReset {
            proofs: restored.len(),
            timestamp: Utc::now(),
        });
        Ok(restored)
    }

    /// The session's periodic loop: step the throughput gauge every tick
    /// and occasionally consult the security sentinel. Runs until the
    /// caller drops or aborts it; the interval dies with the future, so no
    /// callback outlives the session.
    pub async fn run(&self) -> Result<()> {
        let mut tick =
            tokio::time::interval(Duration::from_millis(self.config.telemetry.tick_interval_ms));
        loop {
            tick.tick().await;
            self.on_tick().await;
        }
    }

    async fn on_tick(&self) {
        let tps = self.telemetry.step().await;
        let proofs = self.store.all().await;
        let pending = proofs.iter().filter(|p| p.is_pending_dispute()).count();

        self.events.emit(NodeEvent::TelemetryTick {
            tps,
            proofs: proofs.len(),
            pending_disputes: pending,
            timestamp: Utc::now(),
        });

        let probability = self
            .config
            .telemetry
            .security_check_probability
            .clamp(0.0, 1.0);
        let (roll, entropy) = {
            let mut rng = rand::thread_rng();
            (rng.gen_bool(probability), rng.gen_range(0.0..100.0))
        };
        if roll {
            self.security_sweep(entropy).await;
        }
    }

    async fn security_sweep(&self, entropy: f64) {
        let current = self.security.read().await.clone();
        match self.collaborators.sentinel.scan(&current, entropy).await {
            Ok(next) => {
                if next.version != current.version || next.threat_level != current.threat_level {
                    info!(
                        version = %next.version,
                        threat = ?next.threat_level,
                        "🛡️ Security protocol updated"
                    );
                    self.events.emit(NodeEvent::SecurityRotated {
                        version: next.version.clone(),
                        threat_description: next.threat_description.clone(),
                        timestamp: Utc::now(),
                    });
                    *self.security.write().await = next;
                }
            }
            // Sentinel failures never disturb committed state.
            Err(e) => warn!(error = %e, "Security sweep failed"),
        }
    }
}
