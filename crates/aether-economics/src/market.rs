use crate::amount::TokenAmount;
use crate::ledger::RewardLedger;
use crate::registry::{AgentProfile, AgentRegistry};
use crate::transaction::{TransactionKind, TransactionRecord, TransactionStatus, USER_ACCOUNT};
use aether_types::AgentId;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Risk score forwarded to the authorizer for marketplace purchases.
pub const DEFAULT_RISK_SCORE: u8 = 95;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("agent {agent} offers no service {service}")]
    UnknownService { agent: String, service: String },

    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        required: TokenAmount,
        available: TokenAmount,
    },

    #[error("transaction rejected: {0}")]
    AuthorizationRejected(String),

    #[error("authorizer unavailable: {0}")]
    Authorizer(String),

    #[error("settlement failed: {0}")]
    Settlement(String),
}

/// Decision returned by the external payment-authorization collaborator.
#[derive(Debug, Clone)]
pub struct Authorization {
    pub authorized: bool,
    pub tx_hash: String,
    pub reason: String,
}

#[async_trait]
pub trait TransactionAuthorizer: Send + Sync {
    async fn authorize(
        &self,
        agent: &AgentProfile,
        purpose: &str,
        amount: TokenAmount,
        risk_score: u8,
    ) -> anyhow::Result<Authorization>;
}

/// The operator's spendable balance. The only account in the system that is
/// ever debited.
pub struct UserWallet {
    balance: Arc<RwLock<TokenAmount>>,
}

impl UserWallet {
    pub fn new(airdrop: TokenAmount) -> Self {
        Self {
            balance: Arc::new(RwLock::new(airdrop)),
        }
    }

    pub async fn balance(&self) -> TokenAmount {
        *self.balance.read().await
    }

    async fn debit(&self, amount: TokenAmount) -> Result<TokenAmount, MarketError> {
        let mut balance = self.balance.write().await;
        let after = balance
            .checked_sub(amount)
            .ok_or(MarketError::InsufficientFunds {
                required: amount,
                available: *balance,
            })?;
        *balance = after;
        Ok(after)
    }
}

/// Purchase path for agent services. Validation failures (missing agent or
/// service, insufficient funds) are reported before the authorizer is ever
/// consulted and leave no trace; a rejected authorization likewise mutates
/// nothing and records nothing.
pub struct ServiceMarket {
    registry: Arc<AgentRegistry>,
    ledger: Arc<RewardLedger>,
    wallet: Arc<UserWallet>,
    authorizer: Arc<dyn TransactionAuthorizer>,
}

impl ServiceMarket {
    pub fn new(
        registry: Arc<AgentRegistry>,
        ledger: Arc<RewardLedger>,
        wallet: Arc<UserWallet>,
        authorizer: Arc<dyn TransactionAuthorizer>,
    ) -> Self {
        Self {
            registry,
            ledger,
            wallet,
            authorizer,
        }
    }

    pub async fn purchase(
        &self,
        agent_id: &AgentId,
        service_id: &str,
    ) -> Result<TransactionRecord, MarketError> {
        let agent = self
            .registry
            .get(agent_id)
            .await
            .ok_or_else(|| MarketError::UnknownAgent(agent_id.to_string()))?;

        let service = agent
            .services
            .iter()
            .find(|s| s.id == service_id)
            .cloned()
            .ok_or_else(|| MarketError::UnknownService {
                agent: agent_id.to_string(),
                service: service_id.to_string(),
            })?;

        let available = self.wallet.balance().await;
        if available < service.price {
            return Err(MarketError::InsufficientFunds {
                required: service.price,
                available,
            });
        }

        let auth = self
            .authorizer
            .authorize(&agent, &service.name, service.price, DEFAULT_RISK_SCORE)
            .await
            .map_err(|e| MarketError::Authorizer(e.to_string()))?;

        if !auth.authorized {
            warn!(
                agent = %agent_id,
                service = %service.name,
                reason = %auth.reason,
                "❌ Purchase rejected by authorizer"
            );
            return Err(MarketError::AuthorizationRejected(auth.reason));
        }

        self.wallet.debit(service.price).await?;
        self.registry
            .credit(agent_id, service.price)
            .await
            .map_err(|e| MarketError::Settlement(e.to_string()))?;

        let tx = TransactionRecord {
            id: auth.tx_hash.clone(),
            from: USER_ACCOUNT.to_string(),
            to: agent_id.to_string(),
            amount: service.price,
            kind: TransactionKind::ServicePayment,
            service_name: Some(service.name.clone()),
            timestamp: Utc::now(),
            status: TransactionStatus::Confirmed,
            hash: auth.tx_hash,
        };
        self.ledger.record(tx.clone()).await;

        info!(
            agent = %agent_id,
            service = %service.name,
            price = service.price.tokens(),
            "💸 Service purchased"
        );
        Ok(tx)
    }
}
