use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub node: NodeSettings,
    pub wallet: WalletConfig,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSettings {
    pub data_dir: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Initial operator balance, credited once per session.
    pub airdrop: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub tick_interval_ms: u64,
    /// Per-tick chance of consulting the security sentinel.
    pub security_check_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node: NodeSettings {
                data_dir: PathBuf::from("./data"),
                name: "aether-node".to_string(),
            },
            wallet: WalletConfig { airdrop: 1000 },
            telemetry: TelemetryConfig {
                tick_interval_ms: 1000,
                security_check_probability: 0.05,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl NodeConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Environment overrides sit between the config file and CLI flags in
    /// precedence.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = env::var("AETHER_DATA_DIR") {
            self.node.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(name) = env::var("AETHER_NODE_NAME") {
            if !name.is_empty() {
                self.node.name = name;
            }
        }
        if let Ok(airdrop) = env::var("AETHER_AIRDROP") {
            if let Ok(amount) = airdrop.parse() {
                self.wallet.airdrop = amount;
            }
        }
        if let Ok(level) = env::var("AETHER_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aether-config.toml");

        let mut config = NodeConfig::default();
        config.wallet.airdrop = 2500;
        config.save_to_file(&path).unwrap();

        let loaded = NodeConfig::from_file(&path).unwrap();
        assert_eq!(loaded.wallet.airdrop, 2500);
        assert_eq!(loaded.node.name, "aether-node");
        assert_eq!(loaded.telemetry.tick_interval_ms, 1000);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = NodeConfig::default();
        env::set_var("AETHER_AIRDROP", "777");
        env::set_var("AETHER_NODE_NAME", "testbench");
        config.apply_env_overrides();
        env::remove_var("AETHER_AIRDROP");
        env::remove_var("AETHER_NODE_NAME");

        assert_eq!(config.wallet.airdrop, 777);
        assert_eq!(config.node.name, "testbench");
    }
}
