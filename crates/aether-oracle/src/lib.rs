pub mod authorizer;
pub mod executor;
pub mod identity;
pub mod judge;
pub mod risk;
pub mod security;
pub mod strategy;

pub use authorizer::MockAuthorizer;
pub use executor::{MockExecutor, TaskExecution, TaskExecutor, SWARM_SIZE};
pub use identity::RandomIdentity;
pub use judge::MockJudge;
pub use risk::{MockRiskAssessor, RiskAssessment, RiskAssessor, RiskLevel};
pub use security::{
    MockSentinel, ProtocolStatus, SecurityMonitor, SecurityProtocol, ThreatLevel,
};
pub use strategy::{MockStrategyOptimizer, StrategyOptimizer, StrategyUpdate};
