use crate::transaction::TransactionRecord;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Append-only record of every token-balance-affecting event.
///
/// There is deliberately no mutation or removal API: once appended, an entry
/// is permanent, and insertion order is the total order. Presentation layers
/// may reverse a copy for display but never reorder the underlying log.
pub struct RewardLedger {
    entries: Arc<RwLock<Vec<TransactionRecord>>>,
}

impl Default for RewardLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardLedger {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn record(&self, tx: TransactionRecord) {
        let mut entries = self.entries.write().await;
        info!(
            tx_id = %tx.id,
            from = %tx.from,
            to = %tx.to,
            amount = tx.amount.tokens(),
            kind = ?tx.kind,
            log_len = entries.len() + 1,
            "📦 Transaction recorded"
        );
        entries.push(tx);
    }

    pub async fn all(&self) -> Vec<TransactionRecord> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::TokenAmount;
    use crate::transaction::{TransactionKind, TransactionStatus, NETWORK_MINT};
    use chrono::Utc;

    fn tx(id: &str) -> TransactionRecord {
        TransactionRecord {
            id: id.to_string(),
            from: NETWORK_MINT.to_string(),
            to: "agent-alpha-01".to_string(),
            amount: TokenAmount::from_tokens(20),
            kind: TransactionKind::TrustReward,
            service_name: None,
            timestamp: Utc::now(),
            status: TransactionStatus::Confirmed,
            hash: format!("0x{}", id),
        }
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let ledger = RewardLedger::new();
        ledger.record(tx("a")).await;
        ledger.record(tx("b")).await;
        ledger.record(tx("c")).await;

        let all = ledger.all().await;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "a");
        assert_eq!(all[2].id, "c");
    }

    #[tokio::test]
    async fn test_length_monotone() {
        let ledger = RewardLedger::new();
        let mut last = 0;
        for i in 0..10 {
            ledger.record(tx(&i.to_string())).await;
            let len = ledger.len().await;
            assert!(len > last);
            last = len;
        }
    }
}
