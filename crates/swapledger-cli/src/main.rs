//! SwapLedger command-line host.
//!
//! ```text
//! swapledger --config ledger.json --state ledger-state.json serve < commands.jsonl
//! swapledger --state ledger-state.json invoke create marble1 blue 35 tom
//! ```

mod cli;
mod host;

use std::fs;
use std::io;

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use clap::Parser;
use host::Host;
use swapledger_api::Contract;
use swapledger_types::{LedgerConfig, LogConfig, LogFormat, constants};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.log);
    info!(
        engine = constants::ENGINE_NAME,
        version = constants::VERSION,
        layout = ?config.book.layout,
        "Starting"
    );

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Invoke { function, args } => {
            let mut host = Host::open(Contract::new(config), cli.state)?;
            let response = host.invoke(&function, &args)?;
            println!("{}", serde_json::to_string(&response)?);
        }
        Commands::Serve => {
            let mut host = Host::open(Contract::new(config), cli.state)?;
            host.serve(io::stdin().lock(), io::stdout().lock())?;
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<LedgerConfig> {
    let Some(path) = &cli.config else {
        return Ok(LedgerConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    LedgerConfig::from_json_str(&raw)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Logs go to stderr so stdout carries only responses. `RUST_LOG` wins over
/// the configured filter.
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    match log.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
