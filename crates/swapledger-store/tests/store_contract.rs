//! Contract checks every `Store` adapter must pass, run against the
//! in-memory reference store through a trait object.

use swapledger_store::{MemoryStore, Store, TxContext, composite_key, split_composite_key};

fn seeded() -> MemoryStore {
    let mut store = MemoryStore::new();
    for (id, cat) in [("m1", "blue"), ("m2", "red"), ("m3", "blue"), ("m10", "green")] {
        let record = format!(r#"{{"docType":"asset","id":"{id}","category":"{cat}","size":1,"owner":"tom"}}"#);
        store.put(id, record.into_bytes()).unwrap();
        let idx = composite_key("category~id", &[cat, id]).unwrap();
        store.put(&idx, vec![0]).unwrap();
    }
    store
}

fn plain_keys(store: &dyn Store, start: &str, end: &str) -> Vec<String> {
    store
        .range(start, end)
        .unwrap()
        .map(|kv| kv.unwrap().key)
        .collect()
}

#[test]
fn plain_range_is_lexicographic_and_excludes_index() {
    let store = seeded();
    assert_eq!(plain_keys(&store, "", ""), vec!["m1", "m10", "m2", "m3"]);
    assert_eq!(plain_keys(&store, "m1", "m2"), vec!["m1", "m10"]);
    assert_eq!(store.open_cursors(), 0);
}

#[test]
fn category_scan_returns_ids_in_key_order() {
    let store = seeded();
    let ids: Vec<String> = store
        .range_by_partial_key("category~id", &["blue"])
        .unwrap()
        .map(|kv| {
            let (object_type, attrs) = split_composite_key(&kv.unwrap().key).unwrap();
            assert_eq!(object_type, "category~id");
            attrs[1].clone()
        })
        .collect();
    assert_eq!(ids, vec!["m1", "m3"]);
}

#[test]
fn abandoned_cursor_is_released() {
    let store = seeded();
    {
        let mut cursor = store.range_by_partial_key("category~id", &[]).unwrap();
        assert!(cursor.next().is_some());
        assert_eq!(store.open_cursors(), 1);
    }
    assert_eq!(store.open_cursors(), 0);
}

#[test]
fn query_through_trait_object() {
    let store = seeded();
    let dyn_store: &dyn Store = &store;
    let hits: Vec<String> = dyn_store
        .query(r#"{"selector":{"docType":"asset","category":"blue"}}"#)
        .unwrap()
        .collect_all()
        .unwrap()
        .into_iter()
        .map(|kv| kv.key)
        .collect();
    assert_eq!(hits, vec!["m1", "m3"]);
}

#[test]
fn history_survives_snapshot_round_trip_in_order() {
    let mut store = MemoryStore::new();
    store.begin(TxContext::new());
    store.put("m1", b"{\"v\":1}".to_vec()).unwrap();
    store.end();
    store.put("m1", b"{\"v\":2}".to_vec()).unwrap();
    store.delete("m1").unwrap();

    let restored = MemoryStore::from_json(&store.to_json().unwrap()).unwrap();
    let flags: Vec<bool> = restored
        .history("m1")
        .unwrap()
        .map(|e| e.unwrap().is_delete)
        .collect();
    assert_eq!(flags, vec![false, false, true]);
    assert!(restored.is_empty());
}
