//! The host side of a SwapLedger process: one ledger, one transaction per
//! command.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use swapledger_api::{Contract, Response};
use swapledger_store::{MemoryStore, TxContext};
use swapledger_types::LedgerError;
use tracing::{debug, info};

/// One line of the command stream.
#[derive(Debug, Deserialize)]
pub struct Command {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// A contract bound to its store, optionally persisted to a snapshot file.
pub struct Host {
    contract: Contract,
    store: MemoryStore,
    state: Option<PathBuf>,
}

impl Host {
    /// Open the ledger at `state`, or start an empty one if the file does
    /// not exist yet.
    pub fn open(contract: Contract, state: Option<PathBuf>) -> Result<Self> {
        let store = match &state {
            Some(path) if path.exists() => load(path)?,
            _ => MemoryStore::new(),
        };
        info!(keys = store.len(), state = ?state, "Ledger opened");
        Ok(Self {
            contract,
            store,
            state,
        })
    }

    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Run one function inside its own transaction, then persist. Failed
    /// calls are persisted too: a partial completion leaves real writes.
    pub fn invoke(&mut self, function: &str, args: &[String]) -> Result<Response> {
        self.store.begin(TxContext::new());
        let response = self.contract.invoke(&mut self.store, function, args);
        self.store.end();
        self.save()?;
        Ok(response)
    }

    /// Answer every line of `input` with one JSON response line on `output`.
    /// Blank lines are skipped; malformed lines get an error response.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<usize> {
        let mut handled = 0;
        for line in input.lines() {
            let line = line.context("reading command stream")?;
            if line.trim().is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<Command>(&line) {
                Ok(cmd) => self.invoke(&cmd.function, &cmd.args)?,
                Err(err) => Response::error(&LedgerError::InvalidArgument {
                    reason: format!("malformed command line: {err}"),
                }),
            };
            writeln!(output, "{}", serde_json::to_string(&response)?)?;
            output.flush()?;
            handled += 1;
        }
        debug!(handled, "Command stream closed");
        Ok(handled)
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.state else {
            return Ok(());
        };
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, self.store.to_json()?)
            .with_context(|| format!("writing snapshot {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("replacing snapshot {}", path.display()))?;
        Ok(())
    }
}

fn load(path: &Path) -> Result<MemoryStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    MemoryStore::from_json(&raw).with_context(|| format!("restoring snapshot {}", path.display()))
}
