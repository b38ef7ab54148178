use crate::dispute::DisputeStatus;
use crate::id::{AgentId, ProofId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A peer agent's agreement/disagreement vote attached to a proof at
/// creation time. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub checker_agent_id: AgentId,
    pub checker_agent_name: String,
    #[serde(default)]
    pub checker_role: String,
    pub agreement: bool,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A recorded claim that an agent performed an action, with peer
/// verification and audit metadata attached.
///
/// Identity, payload and cross-checks are immutable after admission; only
/// the dispute fields (`is_disputed`, `dispute_status`, `judge_verdict`,
/// `challenge_reason`, `trust_score_delta`) move, and only forward.
///
/// Serialized with the ledger's wire field names (camelCase) so snapshots
/// written by earlier builds stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionProof {
    pub proof_id: ProofId,
    pub timestamp: DateTime<Utc>,
    pub agent_id: AgentId,
    pub agent_name: String,

    pub input_snippet: String,
    pub action_output: String,
    #[serde(default)]
    pub reasoning: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    #[serde(default)]
    pub cross_checks: Vec<VerificationResult>,

    // Opaque auxiliary metadata: stored verbatim, never evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethical_evaluation: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaboration_trace: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum_metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_protocol_version: Option<String>,

    #[serde(default)]
    pub is_disputed: bool,
    #[serde(default)]
    pub dispute_status: DisputeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge_verdict: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_score_delta: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
}

impl ActionProof {
    /// A dispute that has been opened but not yet resolved. The dashboard's
    /// active-challenges widget filters on this.
    pub fn is_pending_dispute(&self) -> bool {
        self.is_disputed && !self.dispute_status.is_resolved()
    }

    /// Current cumulative trust adjustment, zero if none was ever supplied.
    pub fn trust_delta(&self) -> i64 {
        self.trust_score_delta.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ActionProof {
        ActionProof {
            proof_id: ProofId::new("0xdeadbeef"),
            timestamp: Utc::now(),
            agent_id: AgentId::new("agent-alpha-01"),
            agent_name: "Guardian Prime".to_string(),
            input_snippet: "flag this comment".to_string(),
            action_output: "Flagged as Harassment".to_string(),
            reasoning: vec!["hostile language".to_string()],
            explanation: None,
            cross_checks: vec![],
            ethical_evaluation: None,
            collaboration_trace: None,
            quantum_metadata: None,
            security_protocol_version: None,
            is_disputed: false,
            dispute_status: DisputeStatus::None,
            judge_verdict: None,
            challenge_reason: None,
            trust_score_delta: Some(5),
            block_height: Some(4502119),
        }
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("proofId").is_some());
        assert!(json.get("agentName").is_some());
        assert!(json.get("isDisputed").is_some());
        assert!(json.get("trustScoreDelta").is_some());
        // Unset optionals are omitted, matching snapshots that never
        // carried the field.
        assert!(json.get("judgeVerdict").is_none());
    }

    #[test]
    fn test_defaults_for_sparse_snapshots() {
        // A minimal record, as written before the dispute fields existed.
        let json = r#"{
            "proofId": "0x8f2a...9d12",
            "timestamp": "2024-01-01T00:00:00Z",
            "agentId": "agent-alpha-01",
            "agentName": "Guardian Prime",
            "inputSnippet": "User comment verification.",
            "actionOutput": "Flagged as Harassment"
        }"#;
        let proof: ActionProof = serde_json::from_str(json).unwrap();
        assert!(!proof.is_disputed);
        assert_eq!(proof.dispute_status, DisputeStatus::None);
        assert!(proof.cross_checks.is_empty());
        assert_eq!(proof.trust_delta(), 0);
    }

    #[test]
    fn test_pending_dispute_filter() {
        let mut proof = sample();
        assert!(!proof.is_pending_dispute());

        proof.is_disputed = true;
        proof.dispute_status = DisputeStatus::Open;
        assert!(proof.is_pending_dispute());

        proof.dispute_status = DisputeStatus::ResolvedUpheld;
        assert!(!proof.is_pending_dispute());
    }
}
