use aether_types::{ActionProof, AgentId, DisputeStatus, ProofId, VerificationResult};
use chrono::{Duration, Utc};

/// Fingerprint of the single genesis proof.
pub const SEED_PROOF_ID: &str = "0x8f2a...9d12";

/// The snapshot the store falls back to when nothing (or nothing readable)
/// is persisted, and the target of `reset_to_seed`.
pub fn seed_proofs() -> Vec<ActionProof> {
    vec![ActionProof {
        proof_id: ProofId::new(SEED_PROOF_ID),
        timestamp: Utc::now() - Duration::seconds(10_000),
        agent_id: AgentId::new("agent-alpha-01"),
        agent_name: "Guardian Prime".to_string(),
        input_snippet: "User comment verification regarding aggressive language.".to_string(),
        action_output: "Flagged as Harassment".to_string(),
        reasoning: vec![
            "Contains direct ad hominem attacks.".to_string(),
            "Violates community standard 4.2".to_string(),
        ],
        explanation: None,
        cross_checks: vec![VerificationResult {
            checker_agent_id: AgentId::new("agent-truth-seeker"),
            checker_agent_name: "Veritas Lens".to_string(),
            checker_role: "Fact Checker".to_string(),
            agreement: true,
            comment: "Agreed. Language is hostile.".to_string(),
            timestamp: None,
        }],
        ethical_evaluation: None,
        collaboration_trace: None,
        quantum_metadata: None,
        security_protocol_version: None,
        is_disputed: false,
        dispute_status: DisputeStatus::None,
        judge_verdict: None,
        challenge_reason: None,
        trust_score_delta: None,
        block_height: Some(4_502_119),
    }]
}
