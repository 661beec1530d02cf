//! The `Store` trait: SwapLedger's only view of the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swapledger_types::{LedgerError, Result};

use crate::composite::{MAX_UNICODE_RUNE, composite_key, is_composite_key};
use crate::cursor::Cursor;

/// One `(key, value)` pair from a scan or query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    #[must_use]
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// One historic write to a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub tx_id: String,
    /// `None` when the write was a delete.
    pub value: Option<Vec<u8>>,
    pub timestamp: DateTime<Utc>,
    pub is_delete: bool,
}

/// Synchronous, ordered key-value ledger.
///
/// Implementations provide their own consistency guarantees; SwapLedger
/// assumes it is called from inside one already-serialized state
/// transition. Writes are visible to subsequent reads in the same
/// transition.
pub trait Store {
    /// Value under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`. Empty values are rejected.
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Raw ordered scan over `[start, end)` across both key namespaces.
    /// An empty `end` means unbounded.
    fn scan(&self, start: &str, end: &str) -> Result<Cursor<KeyValue>>;

    /// Evaluate an indexed-query expression. Results are in key order.
    fn query(&self, expr: &str) -> Result<Cursor<KeyValue>>;

    /// Every write ever made to `key`, oldest first.
    fn history(&self, key: &str) -> Result<Cursor<HistoryEntry>>;

    /// Ordered scan over plain keys in `[start, end)`. Composite (index)
    /// keys are never returned. An empty `end` means unbounded.
    fn range(&self, start: &str, end: &str) -> Result<Cursor<KeyValue>> {
        if is_composite_key(start) || is_composite_key(end) {
            return Err(LedgerError::InvalidArgument {
                reason: "range bounds must be plain keys".into(),
            });
        }
        Ok(self
            .scan(start, end)?
            .filter(|kv: &KeyValue| !is_composite_key(&kv.key)))
    }

    /// Scan every composite key of `object_type` whose leading attributes
    /// equal `attrs`.
    fn range_by_partial_key(&self, object_type: &str, attrs: &[&str]) -> Result<Cursor<KeyValue>> {
        let start = composite_key(object_type, attrs)?;
        let end = format!("{start}{MAX_UNICODE_RUNE}");
        self.scan(&start, &end)
    }
}
