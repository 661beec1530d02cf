//! The matching engine: plan, settle, retire.
//!
//! One pass:
//! 1. Load the logical order book (layout-agnostic)
//! 2. Plan the pass with MatchCore
//! 3. Settle each planned cycle in discovery order, skipping cycles whose
//!    parties no longer hold a fitting asset
//! 4. Retire the orders of every cycle that settled
//!
//! If a cycle fails to settle, the orders of the cycles already settled are
//! still retired before the error is returned, so the persisted book never
//! offers an asset that has already moved.

use std::collections::BTreeSet;

use swapledger_matchcore::{MatchPlan, match_root_hex, plan};
use swapledger_registry::{AssetRegistry, OrderBook};
use swapledger_store::Store;
use swapledger_types::{
    BookConfig, CycleKind, ErrorKind, ExecutedCycle, MatchReport, OrderId, Result, SkippedCycle,
    SwapPolicy,
};
use tracing::{debug, info, warn};

use crate::executor::SwapExecutor;

/// Runs matching passes over a store.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    book: BookConfig,
    executor: SwapExecutor,
}

impl MatchingEngine {
    #[must_use]
    pub fn new(book: BookConfig, policy: SwapPolicy) -> Self {
        Self {
            book,
            executor: SwapExecutor::new(policy),
        }
    }

    /// Settle every exact 2-cycle in the book.
    pub fn match_pairwise<S: Store + ?Sized>(&self, store: &mut S) -> Result<MatchReport> {
        self.run_pass(store, CycleKind::Pairwise)
    }

    /// Settle every exact 3-cycle in the book.
    pub fn match_tripartite<S: Store + ?Sized>(&self, store: &mut S) -> Result<MatchReport> {
        self.run_pass(store, CycleKind::Tripartite)
    }

    /// Plan a pass without settling anything.
    pub fn preview<S: Store + ?Sized>(&self, store: &mut S, kind: CycleKind) -> Result<MatchPlan> {
        let orders = OrderBook::new(store, &self.book).open_orders()?;
        Ok(plan(kind, &orders))
    }

    /// Run one matching pass of `kind`.
    ///
    /// A cycle whose parties no longer hold a fitting asset is skipped: its
    /// orders stay open and it is listed in [`MatchReport::skipped`].
    ///
    /// # Errors
    /// Any other failure ends the pass. When earlier cycles of the pass
    /// settled, the error is a `PartialCompletion` counting settled cycles
    /// against planned ones.
    pub fn run_pass<S: Store + ?Sized>(&self, store: &mut S, kind: CycleKind) -> Result<MatchReport> {
        let planned = self.preview(store, kind)?;
        let attempted = planned.cycles.len();
        debug!(kind = %kind, planned = attempted, "Match pass planned");

        let mut executed: Vec<ExecutedCycle> = Vec::with_capacity(attempted);
        let mut skipped: Vec<SkippedCycle> = Vec::new();
        for cycle in &planned.cycles {
            let resolved = self
                .executor
                .resolve(&AssetRegistry::new(&mut *store), &cycle.parties());
            let settled = match resolved {
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    warn!(kind = %kind, orders = ?cycle.order_ids(), error = %err, "Cycle skipped");
                    skipped.push(SkippedCycle {
                        order_ids: cycle.order_ids(),
                        reason: err.to_string(),
                    });
                    continue;
                }
                Err(err) => Err(err),
                Ok(legs) => SwapExecutor::commit(store, legs),
            };
            match settled {
                Ok(receipt) => {
                    debug!(kind = %kind, orders = ?cycle.order_ids(), "Cycle settled");
                    executed.push(ExecutedCycle {
                        kind,
                        order_ids: cycle.order_ids(),
                        legs: receipt.legs,
                    });
                }
                Err(err) => {
                    warn!(
                        kind = %kind,
                        orders = ?cycle.order_ids(),
                        settled = executed.len(),
                        attempted,
                        error = %err,
                        "Cycle failed to settle, ending pass"
                    );
                    self.retire(store, &executed)
                        .map_err(|e| e.after_committed(executed.len(), attempted))?;
                    return Err(err.after_committed(executed.len(), attempted));
                }
            }
        }

        self.retire(store, &executed)
            .map_err(|e| e.after_committed(executed.len(), attempted))?;

        let left_open: usize = skipped.iter().map(|c| c.order_ids.len()).sum();
        let report = MatchReport {
            kind,
            match_root: match_root_hex(&executed),
            cycles: executed,
            skipped,
            remaining: planned.remaining.len() + left_open,
        };
        info!(
            kind = %kind,
            cycles = report.cycles.len(),
            skipped = report.skipped.len(),
            consumed = report.consumed(),
            remaining = report.remaining,
            match_root = %report.match_root,
            "Match pass complete"
        );
        Ok(report)
    }

    fn retire<S: Store + ?Sized>(&self, store: &mut S, executed: &[ExecutedCycle]) -> Result<usize> {
        let consumed: BTreeSet<OrderId> = executed
            .iter()
            .flat_map(|c| c.order_ids.iter().copied())
            .collect();
        OrderBook::new(store, &self.book).retire(&consumed)
    }
}
