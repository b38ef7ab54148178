use crate::amount::TokenAmount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known counterparty for minted rewards and penalty records.
pub const NETWORK_MINT: &str = "NETWORK_MINT";

/// Well-known counterparty for the operator's wallet.
pub const USER_ACCOUNT: &str = "USER";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    ServicePayment,
    TrustReward,
    Penalty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Confirmed,
    Pending,
}

/// One entry in the reward ledger. Immutable once appended; the ledger
/// itself is strictly append-only, so a record is permanent even across a
/// proof-store reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub from: String,
    pub to: String,
    pub amount: TokenAmount,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    pub hash: String,
}
