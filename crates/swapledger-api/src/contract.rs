//! The contract: argument parsing and routing for every [`Function`].

use serde::Serialize;
use swapledger_registry::{AssetRegistry, Clock, OrderBook, SystemClock, query};
use swapledger_settlement::{MatchingEngine, SwapExecutor};
use swapledger_store::Store;
use swapledger_types::{
    AssetId, Category, Descriptor, LedgerConfig, OrderId, OwnerId, Result, SwapParty, parse_size,
};
use tracing::{debug, warn};

use crate::function::Function;
use crate::response::Response;

/// A configured SwapLedger instance. Stateless between calls: everything
/// persistent lives in the store passed to [`Contract::invoke`].
pub struct Contract {
    config: LedgerConfig,
    clock: Box<dyn Clock>,
}

impl Contract {
    /// A contract using the host's wall clock for order ids.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(config: LedgerConfig, clock: Box<dyn Clock>) -> Self {
        Self { config, clock }
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn engine(&self) -> MatchingEngine {
        MatchingEngine::new(self.config.book.clone(), self.config.swap)
    }

    /// Run `function` with positional `args` against `store`.
    pub fn invoke<S, A>(&self, store: &mut S, function: &str, args: &[A]) -> Response
    where
        S: Store + ?Sized,
        A: AsRef<str>,
    {
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
        debug!(function, args = args.len(), "Invoke");
        let result = function
            .parse::<Function>()
            .and_then(|f| self.dispatch(store, f, &args));
        if let Err(err) = &result {
            warn!(function, kind = %err.kind(), error = %err, "Invocation failed");
        }
        Response::from(result)
    }

    /// Parse, route and render one call. Returns the success payload.
    pub fn dispatch<S: Store + ?Sized>(&self, store: &mut S, function: Function, args: &[&str]) -> Result<String> {
        function.check_arity(args.len())?;
        match function {
            Function::Create => {
                AssetRegistry::with_book(store, &self.config.book).create(
                    AssetId::parse(args[0])?,
                    Category::parse(args[1])?,
                    parse_size("size", args[2])?,
                    OwnerId::parse(args[3])?,
                )?;
                Ok(String::new())
            }
            Function::Read => {
                let bytes = AssetRegistry::new(store).read(&AssetId::parse(args[0])?)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Function::Delete => {
                AssetRegistry::new(store).delete(&AssetId::parse(args[0])?)?;
                Ok(String::new())
            }
            Function::Transfer => {
                AssetRegistry::new(store).transfer(&AssetId::parse(args[0])?, &OwnerId::parse(args[1])?)?;
                Ok(String::new())
            }
            Function::TransferByCategory => {
                let category = Category::parse(args[0])?;
                let owner = OwnerId::parse(args[1])?;
                let count = AssetRegistry::new(store).transfer_by_category(&category, &owner)?;
                Ok(format!("Transferred {count} {category} assets to {owner}"))
            }
            Function::RangeList => {
                let cursor = AssetRegistry::new(store).list_by_key_range(args[0], args[1])?;
                render(&query::to_listing(cursor)?)
            }
            Function::CategoryQuery => {
                let assets = AssetRegistry::new(store).list_by_category(&Category::parse(args[0])?)?;
                let listing: Vec<query::QueryRecord> = assets
                    .into_iter()
                    .map(|asset| {
                        Ok(query::QueryRecord {
                            key: asset.id.to_string(),
                            record: serde_json::to_value(&asset)?,
                        })
                    })
                    .collect::<Result<_>>()?;
                render(&listing)
            }
            Function::OwnerQuery => {
                let selector = query::owner_selector(&OwnerId::parse(args[0])?);
                render(&query::run_query(&*store, &selector)?)
            }
            Function::AdHocQuery => render(&query::run_query(&*store, args[0])?),
            Function::HistoryQuery => {
                let id = AssetId::parse(args[0])?;
                render(&query::to_history(store.history(id.as_str())?)?)
            }
            Function::OrderPost => {
                let order = OrderBook::new(store, &self.config.book).post(
                    self.clock.as_ref(),
                    OwnerId::parse(args[0])?,
                    descriptor(args[1], args[2], "want size")?,
                    descriptor(args[3], args[4], "offer size")?,
                )?;
                render(&order)
            }
            Function::OrderList => {
                let (start, end) = (OrderId::parse(args[0])?, OrderId::parse(args[1])?);
                render(&OrderBook::new(store, &self.config.book).list(start, end)?)
            }
            Function::OrderRead => {
                render(&OrderBook::new(store, &self.config.book).read(OrderId::parse(args[0])?)?)
            }
            Function::OrderRemove => {
                let id = OrderId::parse(args[0])?;
                render(&OrderBook::new(store, &self.config.book).remove_by_id(id)?)
            }
            Function::OrderClear => {
                let removed = OrderBook::new(store, &self.config.book).clear()?;
                render(&serde_json::json!({ "removed": removed }))
            }
            Function::PairwiseMatch => render(&self.engine().match_pairwise(store)?),
            Function::TripartiteMatch => render(&self.engine().match_tripartite(store)?),
            Function::Swap | Function::SwapTri => {
                let parties = args
                    .chunks(3)
                    .map(|p| {
                        Ok(SwapParty::new(
                            OwnerId::parse(p[0])?,
                            descriptor(p[1], p[2], "size")?,
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                render(&SwapExecutor::new(self.config.swap).execute(store, &parties)?)
            }
        }
    }
}

fn descriptor(category: &str, size: &str, field: &str) -> Result<Descriptor> {
    Ok(Descriptor::new(Category::parse(category)?, parse_size(field, size)?))
}

fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}
