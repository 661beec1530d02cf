//! Multi-leg swap settlement.
//!
//! Settling a ring takes three phases:
//! 1. Resolve: pick the asset every party gives up. No asset is picked
//!    twice, and nothing is written if any party has no fitting asset.
//! 2. Commit: transfer the legs in ring order.
//! 3. Compensate: if a transfer fails, move the committed legs back to
//!    their senders, newest first.

use std::collections::BTreeSet;

use swapledger_registry::AssetRegistry;
use swapledger_store::Store;
use swapledger_types::{AssetId, LedgerError, Result, SwapLeg, SwapParty, SwapPolicy, SwapReceipt};
use tracing::{debug, warn};

/// Settles swap rings against a store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapExecutor {
    policy: SwapPolicy,
}

impl SwapExecutor {
    #[must_use]
    pub fn new(policy: SwapPolicy) -> Self {
        Self { policy }
    }

    /// Decide every leg of the ring without writing anything.
    ///
    /// # Errors
    /// `InvalidSwap` for fewer than two parties; `OwnedAssetNotFound` if a
    /// party holds no unclaimed asset that fits its offer.
    pub fn resolve<S: Store + ?Sized>(
        &self,
        registry: &AssetRegistry<'_, S>,
        parties: &[SwapParty],
    ) -> Result<Vec<SwapLeg>> {
        if parties.len() < 2 {
            return Err(LedgerError::InvalidSwap {
                reason: format!("a swap needs at least two parties, got {}", parties.len()),
            });
        }

        let mut claimed: BTreeSet<AssetId> = BTreeSet::new();
        let mut legs = Vec::with_capacity(parties.len());
        for (n, party) in parties.iter().enumerate() {
            let receiver = &parties[(n + 1) % parties.len()];
            let asset = registry.resolve_offer(
                &party.owner,
                &party.offer,
                self.policy.require_exact_size,
                &claimed,
            )?;
            claimed.insert(asset.id.clone());
            legs.push(SwapLeg {
                asset_id: asset.id,
                from: party.owner.clone(),
                to: receiver.owner.clone(),
            });
        }
        Ok(legs)
    }

    /// Settle one ring.
    ///
    /// # Errors
    /// Resolution errors leave the store untouched. A failed transfer is
    /// returned as-is once every committed leg has been moved back; if a
    /// move back fails too, the error is `PartialCompletion` counting the
    /// legs still committed.
    pub fn execute<S: Store + ?Sized>(&self, store: &mut S, parties: &[SwapParty]) -> Result<SwapReceipt> {
        let legs = self.resolve(&AssetRegistry::new(&mut *store), parties)?;
        Self::commit(store, legs)
    }

    /// Commit legs produced by [`SwapExecutor::resolve`], in order.
    ///
    /// # Errors
    /// As for [`SwapExecutor::execute`], minus the resolution errors.
    pub fn commit<S: Store + ?Sized>(store: &mut S, legs: Vec<SwapLeg>) -> Result<SwapReceipt> {
        let mut registry = AssetRegistry::new(store);
        for (done, leg) in legs.iter().enumerate() {
            debug!(leg = %leg, "Committing swap leg");
            if let Err(err) = registry.transfer(&leg.asset_id, &leg.to) {
                warn!(leg = %leg, committed = done, error = %err, "Swap leg failed, compensating");
                return Err(Self::compensate(&mut registry, &legs[..done], legs.len(), err));
            }
        }

        Ok(SwapReceipt { legs })
    }

    fn compensate<S: Store + ?Sized>(
        registry: &mut AssetRegistry<'_, S>,
        committed: &[SwapLeg],
        attempted: usize,
        cause: LedgerError,
    ) -> LedgerError {
        for (undone, leg) in committed.iter().rev().enumerate() {
            if let Err(err) = registry.transfer(&leg.asset_id, &leg.from) {
                let still_committed = committed.len() - undone;
                warn!(
                    leg = %leg,
                    still_committed,
                    attempted,
                    error = %err,
                    "Compensation failed, swap left partially applied"
                );
                return cause.after_committed(still_committed, attempted);
            }
            debug!(leg = %leg, "Swap leg reversed");
        }
        cause
    }
}
