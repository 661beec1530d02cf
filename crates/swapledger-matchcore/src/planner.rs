//! Barter cycle planning.
//!
//! ```text
//! plan_pairwise(&[OpenOrder])   -> MatchPlan   // exact 2-cycles
//! plan_tripartite(&[OpenOrder]) -> MatchPlan   // exact 3-cycles
//! ```
//!
//! A cycle is reported in **ring order**: the asset offered by order `n`
//! goes to order `n + 1`, and the last order's asset goes to the first.
//!
//! ## Scan
//!
//! Slots are scanned outer-to-inner (`i < j < k`). The first cycle found
//! wins. Its orders are filtered out to form the next generation of the
//! list and the scan resumes at slot `i` of that generation. Slots before
//! `i` cannot gain a partner by removing orders, so they are not revisited.
//! Every cycle strictly shrinks the list, so a pass always terminates.

use std::collections::BTreeSet;

use swapledger_types::{CycleKind, OpenOrder, OrderId, SwapParty};
use tracing::debug;

/// One cycle a matching pass will execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCycle {
    pub kind: CycleKind,
    /// Orders in ring order.
    pub orders: Vec<OpenOrder>,
}

impl PlannedCycle {
    #[must_use]
    pub fn order_ids(&self) -> Vec<OrderId> {
        self.orders.iter().map(|o| o.id).collect()
    }

    /// Swap parties in ring order: each gives an asset matching its offer.
    #[must_use]
    pub fn parties(&self) -> Vec<SwapParty> {
        self.orders
            .iter()
            .map(|o| SwapParty::new(o.proposer.clone(), o.offer.clone()))
            .collect()
    }

    /// Every order receives exactly what it wants from its predecessor.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        let n = self.orders.len();
        n >= 2
            && (0..n).all(|idx| {
                let receiver = &self.orders[(idx + 1) % n];
                receiver.wants_offer_of(&self.orders[idx])
            })
    }
}

/// The outcome of planning one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPlan {
    pub kind: CycleKind,
    /// Cycles in discovery order.
    pub cycles: Vec<PlannedCycle>,
    /// Orders left open, in their original relative order.
    pub remaining: Vec<OpenOrder>,
}

impl MatchPlan {
    /// Ids of every order consumed by the plan.
    #[must_use]
    pub fn consumed(&self) -> BTreeSet<OrderId> {
        self.cycles
            .iter()
            .flat_map(|c| c.orders.iter().map(|o| o.id))
            .collect()
    }
}

/// Plan a pass of the given kind.
#[must_use]
pub fn plan(kind: CycleKind, orders: &[OpenOrder]) -> MatchPlan {
    match kind {
        CycleKind::Pairwise => plan_pairwise(orders),
        CycleKind::Tripartite => plan_tripartite(orders),
    }
}

/// Plan every exact 2-cycle.
#[must_use]
pub fn plan_pairwise(orders: &[OpenOrder]) -> MatchPlan {
    run(CycleKind::Pairwise, orders, find_pair)
}

/// Plan every exact 3-cycle.
#[must_use]
pub fn plan_tripartite(orders: &[OpenOrder]) -> MatchPlan {
    run(CycleKind::Tripartite, orders, find_triple)
}

/// Ring indices of the first pair whose first slot is `i`.
fn find_pair(orders: &[OpenOrder], i: usize) -> Option<Vec<usize>> {
    let a = &orders[i];
    (i + 1..orders.len())
        .find(|&j| a.is_mutual_with(&orders[j]))
        .map(|j| vec![i, j])
}

/// Ring indices of the first triple whose first slot is `i`.
fn find_triple(orders: &[OpenOrder], i: usize) -> Option<Vec<usize>> {
    let n = orders.len();
    let a = &orders[i];
    for j in i + 1..n {
        let b = &orders[j];
        for k in j + 1..n {
            let c = &orders[k];
            // a takes b's offer, b takes c's, c takes a's: a -> c -> b -> a.
            if a.wants_offer_of(b) && b.wants_offer_of(c) && c.wants_offer_of(a) {
                return Some(vec![i, k, j]);
            }
            // a takes c's offer, c takes b's, b takes a's: a -> b -> c -> a.
            if a.wants_offer_of(c) && c.wants_offer_of(b) && b.wants_offer_of(a) {
                return Some(vec![i, j, k]);
            }
        }
    }
    None
}

fn run<F>(kind: CycleKind, orders: &[OpenOrder], find: F) -> MatchPlan
where
    F: Fn(&[OpenOrder], usize) -> Option<Vec<usize>>,
{
    let mut generation = orders.to_vec();
    let mut cycles = Vec::new();
    let mut i = 0;

    while i < generation.len() {
        let Some(ring) = find(&generation, i) else {
            i += 1;
            continue;
        };
        let cycle = PlannedCycle {
            kind,
            orders: ring.iter().map(|&idx| generation[idx].clone()).collect(),
        };
        debug!(kind = %kind, orders = ?cycle.order_ids(), slot = i, "Cycle found");

        let consumed: BTreeSet<OrderId> = cycle.orders.iter().map(|o| o.id).collect();
        generation.retain(|o| !consumed.contains(&o.id));
        cycles.push(cycle);
    }

    MatchPlan {
        kind,
        cycles,
        remaining: generation,
    }
}
