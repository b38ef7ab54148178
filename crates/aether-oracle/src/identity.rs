use aether_types::IdentityGenerator;
use chrono::Utc;
use rand::Rng;

/// Random identifiers dressed as infrastructure. Fingerprints and hashes
/// come from hashing fresh entropy, so they look like digests without
/// committing to any content.
pub struct RandomIdentity;

impl RandomIdentity {
    fn entropy_digest() -> String {
        let mut rng = rand::thread_rng();
        let seed: [u8; 32] = rng.gen();

        let mut hasher = blake3::Hasher::new();
        hasher.update(&seed);
        hasher.update(&Utc::now().timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
        format!("0x{}", hex::encode(hasher.finalize().as_bytes()))
    }
}

impl IdentityGenerator for RandomIdentity {
    fn proof_fingerprint(&self) -> String {
        Self::entropy_digest()
    }

    fn tx_hash(&self) -> String {
        Self::entropy_digest()
    }

    fn reward_id(&self) -> String {
        format!("reward-{}", Utc::now().timestamp_millis())
    }

    fn block_height(&self) -> u64 {
        rand::thread_rng().gen_range(0..10_000_000)
    }
}
