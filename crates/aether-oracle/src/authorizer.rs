use aether_economics::{AgentProfile, Authorization, TokenAmount, TransactionAuthorizer};
use aether_types::IdentityGenerator;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Mock payment-authorization collaborator. Most requests clear; the
/// occasional rejection exercises the no-side-effect failure path.
pub struct MockAuthorizer {
    identity: Arc<dyn IdentityGenerator>,
}

impl MockAuthorizer {
    pub fn new(identity: Arc<dyn IdentityGenerator>) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl TransactionAuthorizer for MockAuthorizer {
    async fn authorize(
        &self,
        agent: &AgentProfile,
        purpose: &str,
        amount: TokenAmount,
        risk_score: u8,
    ) -> anyhow::Result<Authorization> {
        let authorized = rand::thread_rng().gen_bool(0.95);
        debug!(
            agent = %agent.id,
            purpose = %purpose,
            amount = amount.tokens(),
            risk_score,
            authorized,
            "Transaction authorization"
        );

        if authorized {
            Ok(Authorization {
                authorized: true,
                tx_hash: self.identity.tx_hash(),
                reason: String::new(),
            })
        } else {
            Ok(Authorization {
                authorized: false,
                tx_hash: String::new(),
                reason: format!(
                    "Counterparty risk gate tripped for \"{}\" at {}.",
                    purpose, amount
                ),
            })
        }
    }
}
