pub mod amount;
pub mod engine;
pub mod ledger;
pub mod market;
pub mod registry;
pub mod transaction;

pub use amount::TokenAmount;
pub use engine::{reward_for_delta, RewardEngine};
pub use ledger::RewardLedger;
pub use market::{
    Authorization, MarketError, ServiceMarket, TransactionAuthorizer, UserWallet,
    DEFAULT_RISK_SCORE,
};
pub use registry::{
    AgentCategory, AgentProfile, AgentRegistry, AgentService, DecisionBias, ServiceKind,
    StrategyProfile, StrategyRevision,
};
pub use transaction::{
    TransactionKind, TransactionRecord, TransactionStatus, NETWORK_MINT, USER_ACCOUNT,
};
