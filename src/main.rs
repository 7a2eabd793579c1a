use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lootledger::analysis::build_report;
use lootledger::config::Config;
use lootledger::fetch::{LedgerSource, MarketplaceClient};
use lootledger::models::{HoldingsSnapshot, LedgerSnapshot};

#[derive(Parser)]
#[command(name = "lootledger")]
#[command(about = "Marketplace ledger reconciliation and ROI analysis")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "lootledger.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze snapshot files already on disk
    Analyze {
        /// Ledger snapshot JSON file
        #[arg(long)]
        ledger: PathBuf,
        /// Holdings snapshot JSON file; omitted means an empty inventory
        #[arg(long)]
        holdings: Option<PathBuf>,
    },
    /// Fetch fresh snapshots from the marketplace, then analyze
    Fetch,
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { ledger, holdings } => {
            let config = Config::load_required(&cli.config)?;
            let ledger: LedgerSnapshot = read_json(&ledger)?;
            let holdings: HoldingsSnapshot = match holdings {
                Some(path) => read_json(&path)?,
                None => HoldingsSnapshot::default(),
            };
            let report = build_report(&ledger, &holdings, &config.account_id)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Fetch => {
            let config = Config::load_required(&cli.config)?;
            let mut client =
                MarketplaceClient::new(config.account_id.clone(), config.game_id, config.context_id)
                    .with_base_url(config.marketplace.base_url.clone())
                    .with_page_size(config.marketplace.page_size)
                    .with_request_delay(config.marketplace.request_delay());
            if let Some(cookie) = config.marketplace.session_cookie.clone() {
                client = client.with_session_cookie(SecretString::from(cookie));
            }

            let ledger = client.fetch_ledger().await?;
            let holdings = client.fetch_holdings().await?;
            let report = build_report(&ledger, &holdings, &config.account_id)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Config => {
            let config = Config::load_required(&cli.config)?;
            println!("Config file: {}", cli.config.display());
            println!("Account id: {}", config.account_id);
            println!("Game/context: {}/{}", config.game_id, config.context_id);
            println!("Marketplace: {}", config.marketplace.base_url);
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
