//! Order id issuance.
//!
//! Ids are time-based but strictly increasing within one ledger:
//! `next = max(now_millis, last + 1)`, with `last` persisted under the
//! sequence key as a decimal string. Two posts in the same millisecond
//! therefore never collide.

use swapledger_store::Store;
use swapledger_types::{LedgerError, OrderId, Result};
use tracing::debug;

use crate::clock::Clock;

/// Issues order ids from the sequence record under `key`.
#[derive(Debug, Clone)]
pub struct OrderSequencer<'k> {
    key: &'k str,
}

impl<'k> OrderSequencer<'k> {
    #[must_use]
    pub fn new(key: &'k str) -> Self {
        Self { key }
    }

    /// The last issued id, if any.
    pub fn last<S: Store + ?Sized>(&self, store: &S) -> Result<Option<OrderId>> {
        let Some(raw) = store.get(self.key)? else {
            return Ok(None);
        };
        std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(|n| Some(OrderId(n)))
            .ok_or_else(|| LedgerError::CorruptRecord {
                key: self.key.to_string(),
                reason: "order sequence is not a decimal integer".into(),
            })
    }

    /// Issue and persist the next id.
    pub fn next<S: Store + ?Sized>(&self, store: &mut S, clock: &dyn Clock) -> Result<OrderId> {
        let now = clock.now_millis();
        let id = match self.last(&*store)? {
            Some(last) if last.0 >= now => last.0.checked_add(1).map(OrderId).ok_or_else(|| {
                LedgerError::Internal("order id sequence exhausted".into())
            })?,
            _ => OrderId(now),
        };
        store.put(self.key, id.0.to_string().into_bytes())?;
        debug!(order_id = %id, "Order id issued");
        Ok(id)
    }
}
