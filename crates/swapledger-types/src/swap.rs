//! Swap and match result types.
//!
//! A swap is a closed ring of parties: the asset of party `n` moves to party
//! `n + 1`, and the last party's asset moves to the first. Every executed
//! leg is recorded as a [`SwapLeg`].

use serde::{Deserialize, Serialize};

use crate::{AssetId, Descriptor, OrderId, OwnerId};

/// Which matching pass produced a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleKind {
    Pairwise,
    Tripartite,
}

impl CycleKind {
    /// Number of orders consumed by one cycle of this kind.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::Pairwise => 2,
            Self::Tripartite => 3,
        }
    }
}

impl std::fmt::Display for CycleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pairwise => write!(f, "PAIRWISE"),
            Self::Tripartite => write!(f, "TRIPARTITE"),
        }
    }
}

/// One participant of a swap ring: `owner` gives an asset matching `offer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParty {
    pub owner: OwnerId,
    pub offer: Descriptor,
}

impl SwapParty {
    #[must_use]
    pub fn new(owner: OwnerId, offer: Descriptor) -> Self {
        Self { owner, offer }
    }
}

/// A single committed ownership move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapLeg {
    pub asset_id: AssetId,
    pub from: OwnerId,
    pub to: OwnerId,
}

impl std::fmt::Display for SwapLeg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} -> {}", self.asset_id, self.from, self.to)
    }
}

/// Result of a fully committed swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub legs: Vec<SwapLeg>,
}

/// A matched cycle of orders together with the legs that settled it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedCycle {
    pub kind: CycleKind,
    /// Consumed orders, in ring order (order `n` gives to order `n + 1`).
    pub order_ids: Vec<OrderId>,
    pub legs: Vec<SwapLeg>,
}

/// A planned cycle that could not be resolved. Nothing was written and its
/// orders stay open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCycle {
    pub order_ids: Vec<OrderId>,
    pub reason: String,
}

/// Outcome of one matching pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub kind: CycleKind,
    pub cycles: Vec<ExecutedCycle>,
    #[serde(default)]
    pub skipped: Vec<SkippedCycle>,
    /// Orders left open after the pass, skipped ones included.
    pub remaining: usize,
    /// Hex SHA-256 over the executed cycles, for cross-replica comparison.
    pub match_root: String,
}

impl MatchReport {
    /// Number of orders consumed by this pass.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.cycles.iter().map(|c| c.order_ids.len()).sum()
    }
}
