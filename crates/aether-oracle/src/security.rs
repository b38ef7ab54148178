use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProtocolStatus {
    Secure,
    Rotating,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLevel {
    Low,
    Guarded,
    Elevated,
    Critical,
}

/// Decorative post-quantum posture shown on the dashboard. Entirely
/// cosmetic: the sentinel rotates version strings and threat levels, nothing
/// cryptographic happens anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityProtocol {
    pub version: String,
    pub status: ProtocolStatus,
    pub threat_level: ThreatLevel,
    pub active_algorithms: Vec<String>,
    pub last_rotation: DateTime<Utc>,
    pub threat_description: String,
}

impl Default for SecurityProtocol {
    fn default() -> Self {
        Self {
            version: "PQC-v1.0.4".to_string(),
            status: ProtocolStatus::Secure,
            threat_level: ThreatLevel::Low,
            active_algorithms: vec!["CRYSTALS-Kyber".to_string(), "Dilithium-5".to_string()],
            last_rotation: Utc::now(),
            threat_description: "All systems nominal. Quantum coherence stable.".to_string(),
        }
    }
}

#[async_trait]
pub trait SecurityMonitor: Send + Sync {
    /// Re-evaluate the protocol posture. `entropy` is the caller's roll in
    /// `0.0..100.0`; the monitor decides whether anything changes.
    async fn scan(
        &self,
        current: &SecurityProtocol,
        entropy: f64,
    ) -> anyhow::Result<SecurityProtocol>;
}

/// Mock sentinel: high entropy rolls rotate the protocol patch version,
/// occasionally raising the threat level for a cycle.
pub struct MockSentinel;

fn bump_patch(version: &str) -> String {
    match version.rsplit_once('.') {
        Some((prefix, patch)) => match patch.parse::<u32>() {
            Ok(n) => format!("{}.{}", prefix, n + 1),
            Err(_) => version.to_string(),
        },
        None => version.to_string(),
    }
}

#[async_trait]
impl SecurityMonitor for MockSentinel {
    async fn scan(
        &self,
        current: &SecurityProtocol,
        entropy: f64,
    ) -> anyhow::Result<SecurityProtocol> {
        if entropy < 70.0 {
            return Ok(current.clone());
        }

        let mut rng = rand::thread_rng();
        let threat_level = match rng.gen_range(0..10) {
            0 => ThreatLevel::Critical,
            1..=2 => ThreatLevel::Elevated,
            3..=5 => ThreatLevel::Guarded,
            _ => ThreatLevel::Low,
        };

        let rotated = SecurityProtocol {
            version: bump_patch(&current.version),
            status: ProtocolStatus::Secure,
            threat_level,
            active_algorithms: current.active_algorithms.clone(),
            last_rotation: Utc::now(),
            threat_description: match threat_level {
                ThreatLevel::Low => "All systems nominal. Quantum coherence stable.".to_string(),
                ThreatLevel::Guarded => {
                    "Minor interference patterns observed; monitoring.".to_string()
                }
                ThreatLevel::Elevated => {
                    "Unusual probe activity on lattice channels; keys rotated.".to_string()
                }
                ThreatLevel::Critical => {
                    "Decoherence spike detected; emergency rotation applied.".to_string()
                }
            },
        };

        info!(
            version = %rotated.version,
            threat = ?rotated.threat_level,
            "🛡️ Security protocol rotated"
        );
        Ok(rotated)
    }
}
