//! In-memory reference [`Store`].
//!
//! State lives in a `BTreeMap`, so every scan is in key order. Every write
//! is also appended to a per-key history stamped with the active
//! [`TxContext`]; outside an explicit transaction each write gets a fresh
//! context.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swapledger_types::{LedgerError, Result};
use tracing::debug;
use uuid::Uuid;

use crate::composite::is_composite_key;
use crate::cursor::Cursor;
use crate::selector::Selector;
use crate::store::{HistoryEntry, KeyValue, Store};

/// Identity and time of the state transition currently being applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxContext {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
}

impl TxContext {
    /// A fresh context: UUID v7 id, current UTC time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tx_id: Uuid::now_v7().to_string(),
            timestamp: Utc::now(),
        }
    }

    /// A context with caller-chosen id and time.
    #[must_use]
    pub fn with(tx_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            tx_id: tx_id.into(),
            timestamp,
        }
    }
}

impl Default for TxContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Reference store backed by ordered maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: BTreeMap<String, Vec<u8>>,
    history: BTreeMap<String, Vec<HistoryEntry>>,
    tx: Option<TxContext>,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every following write with `tx` until [`MemoryStore::end`].
    pub fn begin(&mut self, tx: TxContext) {
        debug!(tx_id = %tx.tx_id, "Transaction begin");
        self.tx = Some(tx);
    }

    /// Leave the current transaction context.
    pub fn end(&mut self) {
        if let Some(tx) = self.tx.take() {
            debug!(tx_id = %tx.tx_id, "Transaction end");
        }
    }

    /// Number of cursors handed out and not yet released.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Number of live keys, index keys included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Serializable copy of state and history.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self
                .state
                .iter()
                .map(|(k, v)| (k.clone(), hex::encode(v)))
                .collect(),
            history: self
                .history
                .iter()
                .map(|(k, entries)| (k.clone(), entries.iter().map(SnapshotWrite::from).collect()))
                .collect(),
        }
    }

    /// Rebuild a store from a snapshot.
    pub fn restore(snapshot: Snapshot) -> Result<Self> {
        let mut state = BTreeMap::new();
        for (key, value) in snapshot.state {
            let bytes = decode_hex(&key, &value)?;
            state.insert(key, bytes);
        }
        let mut history = BTreeMap::new();
        for (key, writes) in snapshot.history {
            let entries = writes
                .into_iter()
                .map(|w| w.into_entry(&key))
                .collect::<Result<Vec<_>>>()?;
            history.insert(key, entries);
        }
        Ok(Self {
            state,
            history,
            ..Self::default()
        })
    }

    /// Encode a snapshot of this store as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Restore a store from [`MemoryStore::to_json`] output.
    pub fn from_json(raw: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(raw)?;
        Self::restore(snapshot)
    }

    fn record(&mut self, key: &str, value: Option<Vec<u8>>) {
        let tx = self.tx.clone().unwrap_or_default();
        let is_delete = value.is_none();
        self.history.entry(key.to_string()).or_default().push(HistoryEntry {
            tx_id: tx.tx_id,
            value,
            timestamp: tx.timestamp,
            is_delete,
        });
    }

    fn open<T: Send + 'static>(&self, items: Vec<T>) -> Cursor<T> {
        let counter = Arc::clone(&self.open_cursors);
        counter.fetch_add(1, Ordering::SeqCst);
        Cursor::from_vec(items).on_release(move || {
            counter.fetch_sub(1, Ordering::SeqCst);
        })
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.state.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        if key.is_empty() {
            return Err(LedgerError::InvalidArgument {
                reason: "key must not be empty".into(),
            });
        }
        if value.is_empty() {
            return Err(LedgerError::InvalidArgument {
                reason: format!("value for {key:?} must not be empty"),
            });
        }
        self.record(key, Some(value.clone()));
        self.state.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        if self.state.remove(key).is_some() {
            self.record(key, None);
        }
        Ok(())
    }

    fn scan(&self, start: &str, end: &str) -> Result<Cursor<KeyValue>> {
        if !end.is_empty() && end < start {
            return Ok(self.open(Vec::new()));
        }
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };
        let items = self
            .state
            .range::<str, _>((Bound::Included(start), upper))
            .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
            .collect();
        Ok(self.open(items))
    }

    fn query(&self, expr: &str) -> Result<Cursor<KeyValue>> {
        let selector = Selector::parse(expr)?;
        let items = self
            .state
            .iter()
            .filter(|(k, _)| !is_composite_key(k))
            .filter_map(|(k, v)| {
                let doc: serde_json::Value = serde_json::from_slice(v).ok()?;
                selector
                    .matches(&doc)
                    .then(|| KeyValue::new(k.clone(), v.clone()))
            })
            .collect();
        Ok(self.open(items))
    }

    fn history(&self, key: &str) -> Result<Cursor<HistoryEntry>> {
        let entries = self.history.get(key).cloned().unwrap_or_default();
        Ok(self.open(entries))
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// JSON-friendly image of a [`MemoryStore`]. Values are hex encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: BTreeMap<String, String>,
    #[serde(default)]
    pub history: BTreeMap<String, Vec<SnapshotWrite>>,
}

/// One history entry inside a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotWrite {
    pub tx_id: String,
    pub value: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub is_delete: bool,
}

impl From<&HistoryEntry> for SnapshotWrite {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            tx_id: entry.tx_id.clone(),
            value: entry.value.as_ref().map(hex::encode),
            timestamp: entry.timestamp,
            is_delete: entry.is_delete,
        }
    }
}

impl SnapshotWrite {
    fn into_entry(self, key: &str) -> Result<HistoryEntry> {
        let value = self.value.map(|v| decode_hex(key, &v)).transpose()?;
        Ok(HistoryEntry {
            tx_id: self.tx_id,
            value,
            timestamp: self.timestamp,
            is_delete: self.is_delete,
        })
    }
}

fn decode_hex(key: &str, raw: &str) -> Result<Vec<u8>> {
    hex::decode(raw).map_err(|err| LedgerError::CorruptRecord {
        key: key.to_string(),
        reason: format!("bad hex in snapshot: {err}"),
    })
}
