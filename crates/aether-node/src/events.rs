//! Node-level event bus.
//!
//! Observers (notification toasts, live views) subscribe here instead of
//! polling. The channel is lossy for slow consumers; mutations never block
//! on delivery.

use aether_types::DisputeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const EVENT_BUFFER: usize = 512;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum NodeEvent {
    ProofAdmitted {
        proof_id: String,
        agent_id: String,
        /// Reward minted by the admission, if the trust delta qualified.
        reward: Option<u64>,
        timestamp: DateTime<Utc>,
    },
    DisputeOpened {
        proof_id: String,
        timestamp: DateTime<Utc>,
    },
    DisputeResolved {
        proof_id: String,
        status: DisputeStatus,
        timestamp: DateTime<Utc>,
    },
    ServicePurchased {
        agent_id: String,
        service: String,
        price: u64,
        timestamp: DateTime<Utc>,
    },
    SecurityRotated {
        version: String,
        threat_description: String,
        timestamp: DateTime<Utc>,
    },
    TelemetryTick {
        tps: u32,
        proofs: usize,
        pending_disputes: usize,
        timestamp: DateTime<Utc>,
    },
    StoreReset {
        proofs: usize,
        timestamp: DateTime<Utc>,
    },
}

pub struct EventBus {
    tx: broadcast::Sender<NodeEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUFFER);
        Self { tx }
    }

    pub fn emit(&self, event: NodeEvent) {
        // No subscribers is fine; events are advisory.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NodeEvent> {
        self.tx.subscribe()
    }
}
