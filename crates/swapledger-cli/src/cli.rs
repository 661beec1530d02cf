//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "swapledger")]
#[command(version, about = "Asset registry and barter matching over a local ledger", long_about = None)]
pub struct Cli {
    /// Configuration file (JSON). Defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ledger snapshot to load on start and rewrite after every command.
    /// Without it the ledger lives only for this process.
    #[arg(short, long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read `{"function": .., "args": [..]}` lines from stdin and answer each
    /// with one response line (the default).
    Serve,

    /// Run a single function and print its response.
    Invoke {
        /// Function name, e.g. `create` or `pairwise-match`
        function: String,

        /// Positional string arguments
        args: Vec<String>,
    },

    /// Print the effective configuration.
    Config,
}
