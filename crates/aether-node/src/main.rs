use aether_node::{logging, AetherNode, NodeConfig};
use aether_types::{AgentId, ProofId};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "aether")]
#[command(about = "Aether Ledger - agent proof ledger and dispute node", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the node's periodic loop
    Start {
        /// Data directory for the proof snapshot
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Write a default configuration file
    Init {
        /// Output directory for the configuration
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Execute one task through an agent and admit the proof
    RunTask {
        /// Acting agent id, e.g. agent-alpha-01
        #[arg(short, long)]
        agent: String,

        /// Task input text
        #[arg(short, long)]
        input: String,

        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Challenge a proof by fingerprint
    Challenge {
        /// Proof fingerprint
        #[arg(short, long)]
        proof: String,

        /// Why the proof should be overturned
        #[arg(short, long)]
        reason: String,

        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Purchase an agent service from the operator wallet
    Purchase {
        #[arg(short, long)]
        agent: String,

        /// Service id, e.g. srv-1a
        #[arg(short, long)]
        service: String,

        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Show ledger status
    Status {
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Wipe the proof store back to the seed snapshot
    Reset {
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn load_config(cli_config: &Option<PathBuf>, data_dir: &Path) -> Result<NodeConfig> {
    // Priority order: CLI args > env vars > config file > defaults.
    let mut config = if let Some(path) = cli_config {
        NodeConfig::from_file(path)?
    } else if Path::new("./aether-config.toml").exists() {
        NodeConfig::from_file(Path::new("./aether-config.toml"))?
    } else {
        NodeConfig::default()
    };

    config.apply_env_overrides();

    if data_dir != Path::new("./data") {
        config.node.data_dir = data_dir.to_path_buf();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Load config early to get logging settings.
    let temp_config = match &cli.config {
        Some(path) => NodeConfig::from_file(path).ok(),
        None if Path::new("./aether-config.toml").exists() => {
            NodeConfig::from_file(Path::new("./aether-config.toml")).ok()
        }
        None => None,
    };
    let logging_config = temp_config.map(|c| c.logging).unwrap_or_default();
    logging::init_logging(&logging_config, cli.verbose)?;

    match cli.command {
        Commands::Start { data_dir } => {
            let config = load_config(&cli.config, &data_dir)?;
            let node = AetherNode::new(config).await?;

            info!("✅ NODE READY - ledger online");
            tokio::select! {
                result = node.run() => result?,
                _ = tokio::signal::ctrl_c() => {
                    info!("🛑 Shutting down gracefully");
                }
            }
            Ok(())
        }

        Commands::Init { output } => {
            std::fs::create_dir_all(&output)?;
            let config = NodeConfig::default();
            let path = output.join("aether-config.toml");
            config.save_to_file(&path)?;
            info!(path = ?path, "Configuration saved");
            Ok(())
        }

        Commands::RunTask {
            agent,
            input,
            data_dir,
        } => {
            let config = load_config(&cli.config, &data_dir)?;
            let node = AetherNode::new(config).await?;

            let proof = node.run_agent_task(&AgentId::new(agent), &input).await?;
            println!("Proof admitted: {}", proof.proof_id);
            println!("Output:         {}", proof.action_output);
            for check in &proof.cross_checks {
                println!(
                    "Cross-check:    {} {} - {}",
                    check.checker_agent_name,
                    if check.agreement { "agreed" } else { "disagreed" },
                    check.comment
                );
            }
            println!("Trust delta:    {:+}", proof.trust_delta());
            Ok(())
        }

        Commands::Challenge {
            proof,
            reason,
            data_dir,
        } => {
            let config = load_config(&cli.config, &data_dir)?;
            let node = AetherNode::new(config).await?;

            let resolved = node.challenge(&ProofId::new(proof), &reason).await?;
            println!("Status:  {}", resolved.dispute_status);
            if let Some(verdict) = &resolved.judge_verdict {
                println!("Verdict: {}", verdict);
            }
            println!("Trust:   {:+}", resolved.trust_delta());
            Ok(())
        }

        Commands::Purchase {
            agent,
            service,
            data_dir,
        } => {
            let config = load_config(&cli.config, &data_dir)?;
            let node = AetherNode::new(config).await?;

            let tx = node.purchase(&AgentId::new(agent), &service).await?;
            println!(
                "Purchased {} for {} (tx {})",
                tx.service_name.as_deref().unwrap_or("service"),
                tx.amount,
                tx.hash
            );
            println!("Wallet balance: {}", node.user_balance().await);
            Ok(())
        }

        Commands::Status { data_dir } => {
            let config = load_config(&cli.config, &data_dir)?;
            let node = AetherNode::new(config).await?;

            let proofs = node.proofs().await;
            let pending = proofs.iter().filter(|p| p.is_pending_dispute()).count();
            println!("Proofs:           {}", proofs.len());
            println!("Pending disputes: {}", pending);
            println!("Wallet balance:   {}", node.user_balance().await);
            for agent in node.agents().await {
                println!(
                    "  {:20} {:>10}  trust {:.1}%  disputes lost {}",
                    agent.id.as_str(),
                    agent.token_balance.to_string(),
                    agent.reputation_score,
                    agent.disputes_lost
                );
            }
            Ok(())
        }

        Commands::Reset { data_dir, yes } => {
            if !yes {
                print!("WARNING: this wipes the local ledger state. Continue? [y/N]: ");
                io::stdout().flush()?;

                let mut response = String::new();
                io::stdin().read_line(&mut response)?;
                if !response.trim().eq_ignore_ascii_case("y") {
                    info!("Reset cancelled");
                    return Ok(());
                }
            }

            let config = load_config(&cli.config, &data_dir)?;
            let node = AetherNode::new(config).await?;
            let restored = node.reset_ledger().await?;
            println!("Ledger reset: {} seed proof(s) restored", restored.len());
            Ok(())
        }
    }
}
