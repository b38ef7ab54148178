use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a challenge against a proof.
///
/// The machine is forward-only: `None -> Open -> Resolved_*`. A resolved
/// status is terminal. Every status other than `None` implies the proof is
/// marked disputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisputeStatus {
    /// No challenge has ever been raised.
    #[default]
    None,

    /// Challenge submitted, resolution pending (or stuck awaiting retry).
    Open,

    /// The agent's original action was affirmed; the challenger lost.
    #[serde(rename = "Resolved_Upheld")]
    ResolvedUpheld,

    /// The agent's action was invalidated; the challenger won.
    #[serde(rename = "Resolved_Overturned")]
    ResolvedOverturned,
}

impl DisputeStatus {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::ResolvedUpheld | Self::ResolvedOverturned)
    }

    /// Whether this status requires `is_disputed` to be set on the proof.
    pub fn implies_disputed(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "None",
            Self::Open => "Open",
            Self::ResolvedUpheld => "Resolved_Upheld",
            Self::ResolvedOverturned => "Resolved_Overturned",
        };
        write!(f, "{}", label)
    }
}

/// Outcome rendered by the dispute resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Challenge rejected, agent affirmed.
    Upheld,
    /// Challenge accepted, agent's action invalidated.
    Overturned,
}

impl Verdict {
    /// Protocol-level reputation policy. These are fixed constants of the
    /// dispute protocol, not per-ruling inputs.
    pub fn trust_delta(&self) -> i64 {
        match self {
            Self::Upheld => 5,
            Self::Overturned => -15,
        }
    }

    pub fn resolved_status(&self) -> DisputeStatus {
        match self {
            Self::Upheld => DisputeStatus::ResolvedUpheld,
            Self::Overturned => DisputeStatus::ResolvedOverturned,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upheld => write!(f, "Upheld"),
            Self::Overturned => write!(f, "Overturned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&DisputeStatus::ResolvedUpheld).unwrap(),
            "\"Resolved_Upheld\""
        );
        assert_eq!(
            serde_json::to_string(&DisputeStatus::ResolvedOverturned).unwrap(),
            "\"Resolved_Overturned\""
        );
        let open: DisputeStatus = serde_json::from_str("\"Open\"").unwrap();
        assert_eq!(open, DisputeStatus::Open);
    }

    #[test]
    fn test_policy_constants() {
        assert_eq!(Verdict::Upheld.trust_delta(), 5);
        assert_eq!(Verdict::Overturned.trust_delta(), -15);
    }

    #[test]
    fn test_terminal_states() {
        assert!(DisputeStatus::ResolvedUpheld.is_resolved());
        assert!(DisputeStatus::ResolvedOverturned.is_resolved());
        assert!(!DisputeStatus::Open.is_resolved());
        assert!(!DisputeStatus::None.is_resolved());
        assert!(DisputeStatus::Open.implies_disputed());
        assert!(!DisputeStatus::None.implies_disputed());
    }
}
