//! Query bridge.
//!
//! Converts `(key, value)` cursors from range scans and indexed queries
//! into either a flat [`QueryRecord`] listing (what callers get back) or a
//! typed `key -> record` map (what owner lookups consume). Cursors are
//! always drained or dropped before these functions return.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use swapledger_store::{Cursor, HistoryEntry, KeyValue, Store};
use swapledger_types::{OwnerId, Result, constants, decode_record};

/// One entry of a flat listing: `{"Key": .., "Record": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    #[serde(rename = "Key")]
    pub key: String,
    /// The stored JSON document, or the raw value as a string when it is
    /// not JSON.
    #[serde(rename = "Record")]
    pub record: Value,
}

impl From<KeyValue> for QueryRecord {
    fn from(kv: KeyValue) -> Self {
        let record = json_or_string(&kv.value);
        Self {
            key: kv.key,
            record,
        }
    }
}

/// One entry of a history listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "TxId")]
    pub tx_id: String,
    /// The value written, `null` for a delete.
    #[serde(rename = "Value")]
    pub value: Value,
    /// RFC 3339, UTC.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "IsDelete")]
    pub is_delete: bool,
}

impl From<HistoryEntry> for HistoryRecord {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            tx_id: entry.tx_id,
            value: entry.value.as_deref().map_or(Value::Null, json_or_string),
            timestamp: entry.timestamp.to_rfc3339(),
            is_delete: entry.is_delete,
        }
    }
}

fn json_or_string(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Drain a history cursor, oldest write first.
pub fn to_history(cursor: Cursor<HistoryEntry>) -> Result<Vec<HistoryRecord>> {
    cursor.map(|e| e.map(HistoryRecord::from)).collect()
}

/// Drain a cursor into a flat listing, in cursor order.
pub fn to_listing(cursor: Cursor<KeyValue>) -> Result<Vec<QueryRecord>> {
    cursor.map(|kv| kv.map(QueryRecord::from)).collect()
}

/// Drain a cursor into a typed map. Any record that does not decode as `T`
/// fails the whole conversion with `CorruptRecord`.
pub fn to_keyed<T: DeserializeOwned>(cursor: Cursor<KeyValue>) -> Result<BTreeMap<String, T>> {
    let mut out = BTreeMap::new();
    for kv in cursor {
        let kv = kv?;
        let record = decode_record(&kv.key, &kv.value)?;
        out.insert(kv.key, record);
    }
    Ok(out)
}

/// Run a caller-supplied query expression and list the hits.
pub fn run_query<S: Store + ?Sized>(store: &S, expr: &str) -> Result<Vec<QueryRecord>> {
    to_listing(store.query(expr)?)
}

/// Selector for every asset held by `owner`.
#[must_use]
pub fn owner_selector(owner: &OwnerId) -> String {
    json!({
        "selector": {
            "docType": constants::ASSET_DOC_TYPE,
            "owner": owner.as_str(),
        }
    })
    .to_string()
}

/// Selector for every record tagged with `doc_type`.
#[must_use]
pub fn doc_type_selector(doc_type: &str) -> String {
    json!({ "selector": { "docType": doc_type } }).to_string()
}

#[cfg(test)]
mod tests {
    use swapledger_store::MemoryStore;
    use swapledger_types::{Asset, LedgerError};

    use super::*;

    fn store_with_assets() -> MemoryStore {
        let mut store = MemoryStore::new();
        for asset in [
            Asset::dummy("m1", "blue", 35, "tom"),
            Asset::dummy("m2", "red", 50, "jerry"),
            Asset::dummy("m3", "green", 10, "tom"),
        ] {
            let bytes = serde_json::to_vec(&asset).unwrap();
            store.put(asset.id.as_str(), bytes).unwrap();
        }
        store
    }

    #[test]
    fn listing_shape() {
        let store = store_with_assets();
        let listing = run_query(&store, &owner_selector(&OwnerId::parse("Tom").unwrap())).unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].key, "m1");
        assert_eq!(listing[0].record["category"], "blue");

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json[1]["Key"], "m3");
        assert_eq!(json[1]["Record"]["size"], 10);
    }

    #[test]
    fn non_json_values_are_listed_as_strings() {
        let mut store = MemoryStore::new();
        store.put("plain", b"hello".to_vec()).unwrap();
        let listing = to_listing(store.range("", "").unwrap()).unwrap();
        assert_eq!(listing[0].record, Value::String("hello".into()));
    }

    #[test]
    fn keyed_map_is_typed() {
        let store = store_with_assets();
        let owned: BTreeMap<String, Asset> =
            to_keyed(store.query(&owner_selector(&OwnerId::parse("jerry").unwrap())).unwrap())
                .unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned["m2"].size, 50);
    }

    #[test]
    fn keyed_map_rejects_schema_mismatch() {
        let mut store = store_with_assets();
        store
            .put("bad", br#"{"docType":"asset","owner":"tom","size":"big"}"#.to_vec())
            .unwrap();
        let err = to_keyed::<Asset>(store.query(&owner_selector(&OwnerId::parse("tom").unwrap())).unwrap())
            .unwrap_err();
        assert!(matches!(err, LedgerError::CorruptRecord { ref key, .. } if key == "bad"));
        assert_eq!(store.open_cursors(), 0);
    }

    #[test]
    fn history_shape() {
        let mut store = MemoryStore::new();
        store.put("m1", br#"{"owner":"tom"}"#.to_vec()).unwrap();
        store.delete("m1").unwrap();
        let history = to_history(store.history("m1").unwrap()).unwrap();
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json[0]["Value"]["owner"], "tom");
        assert_eq!(json[0]["IsDelete"], false);
        assert!(json[1]["Value"].is_null());
        assert_eq!(json[1]["IsDelete"], true);
        assert!(json[1]["TxId"].as_str().is_some_and(|s| !s.is_empty()));
        assert!(json[1]["Timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn selectors_are_valid_queries() {
        let store = store_with_assets();
        assert_eq!(run_query(&store, &doc_type_selector("asset")).unwrap().len(), 3);
    }
}
