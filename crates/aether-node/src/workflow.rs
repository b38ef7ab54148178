use crate::node::AetherNode;
use aether_types::{AgentId, ProofId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Processing,
    Verified,
    Failed,
}

/// One stage of a multi-agent pipeline. Each verified step leaves an
/// admitted proof behind; a failed step admits nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: String,
    pub agent_id: AgentId,
    pub task_description: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_id: Option<ProofId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl WorkflowStep {
    pub fn new(id: impl Into<String>, agent_id: AgentId, task: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            agent_id,
            task_description: task.into(),
            status: StepStatus::Pending,
            proof_id: None,
            output: None,
        }
    }
}

impl AetherNode {
    /// Run a workflow sequentially. The first failing step is marked
    /// `Failed` and aborts the remainder (left `Pending`); proofs admitted
    /// by earlier steps stay committed.
    pub async fn run_workflow(&self, mut steps: Vec<WorkflowStep>) -> Vec<WorkflowStep> {
        let mut aborted = false;

        for step in steps.iter_mut() {
            if aborted {
                break;
            }
            step.status = StepStatus::Processing;
            let agent_id = step.agent_id.clone();
            let task = step.task_description.clone();

            match self.run_agent_task(&agent_id, &task).await {
                Ok(proof) => {
                    info!(step = %step.id, proof = %proof.proof_id.short(), "Workflow step verified");
                    step.status = StepStatus::Verified;
                    step.proof_id = Some(proof.proof_id);
                    step.output = Some(proof.action_output);
                }
                Err(e) => {
                    warn!(step = %step.id, error = %e, "Workflow step failed, aborting pipeline");
                    step.status = StepStatus::Failed;
                    aborted = true;
                }
            }
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&StepStatus::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(
            serde_json::to_string(&StepStatus::Verified).unwrap(),
            "\"verified\""
        );
    }

    #[test]
    fn test_new_step_is_pending() {
        let step = WorkflowStep::new("wf-1", AgentId::new("agent-alpha-01"), "triage queue");
        assert_eq!(step.status, StepStatus::Pending);
        assert!(step.proof_id.is_none());
    }
}
