//! Match root: a digest of everything a matching pass executed.
//!
//! Replicas applying the same pass to the same ledger must settle the same
//! cycles with the same assets. The `match_root` lets them compare a
//! single hash instead of full reports.

use sha2::{Digest, Sha256};
use swapledger_types::ExecutedCycle;

/// Compute the match root over executed cycles.
///
/// The hash depends on, in order:
/// - cycle kind and consumed order ids
/// - each leg's asset id, sender and recipient
#[must_use]
pub fn compute_match_root(cycles: &[ExecutedCycle]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"swapledger:match_root:v1:");
    hasher.update((cycles.len() as u64).to_le_bytes());

    for cycle in cycles {
        hasher.update(cycle.kind.to_string().as_bytes());
        hasher.update((cycle.order_ids.len() as u64).to_le_bytes());
        for id in &cycle.order_ids {
            hasher.update(id.0.to_le_bytes());
        }
        hasher.update((cycle.legs.len() as u64).to_le_bytes());
        for leg in &cycle.legs {
            // Length-prefix every string so field boundaries are unambiguous.
            for part in [leg.asset_id.as_str(), leg.from.as_str(), leg.to.as_str()] {
                hasher.update((part.len() as u64).to_le_bytes());
                hasher.update(part.as_bytes());
            }
        }
    }

    hasher.finalize().into()
}

/// Hex form of [`compute_match_root`], as carried in a `MatchReport`.
#[must_use]
pub fn match_root_hex(cycles: &[ExecutedCycle]) -> String {
    hex::encode(compute_match_root(cycles))
}

/// Check a hex match root against the cycles it claims to cover.
#[must_use]
pub fn verify_match_root(cycles: &[ExecutedCycle], expected_hex: &str) -> bool {
    match_root_hex(cycles).eq_ignore_ascii_case(expected_hex)
}
