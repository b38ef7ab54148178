use rand::Rng;
use tokio::sync::RwLock;

const TPS_FLOOR: i32 = 8;
const TPS_CEILING: i32 = 60;

/// Decorative throughput gauge: a clamped random walk, stepped once per
/// timer tick.
pub struct NetworkTelemetry {
    tps: RwLock<u32>,
}

impl Default for NetworkTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkTelemetry {
    pub fn new() -> Self {
        Self {
            tps: RwLock::new(12),
        }
    }

    pub async fn tps(&self) -> u32 {
        *self.tps.read().await
    }

    pub async fn step(&self) -> u32 {
        let mut tps = self.tps.write().await;
        let drift = rand::thread_rng().gen_range(-5..=5);
        let next = (*tps as i32 + drift).clamp(TPS_FLOOR, TPS_CEILING);
        *tps = next as u32;
        *tps
    }
}
