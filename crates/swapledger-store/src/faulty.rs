//! Fault injection for exercising failure paths.
//!
//! [`FaultyStore`] wraps any [`Store`] and turns selected calls into
//! [`LedgerError::Store`] failures. Failed writes leave the inner store
//! untouched.

use std::collections::HashSet;

use swapledger_types::{LedgerError, Result};

use crate::cursor::Cursor;
use crate::store::{HistoryEntry, KeyValue, Store};

/// A store wrapper that fails on demand.
#[derive(Debug, Default)]
pub struct FaultyStore<S> {
    inner: S,
    fail_get: HashSet<String>,
    fail_put: HashSet<String>,
    fail_delete: HashSet<String>,
    puts_before_failure: Option<usize>,
    fail_query: bool,
    puts: usize,
}

impl<S: Store> FaultyStore<S> {
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_get: HashSet::new(),
            fail_put: HashSet::new(),
            fail_delete: HashSet::new(),
            puts_before_failure: None,
            fail_query: false,
            puts: 0,
        }
    }

    /// Fail every `get` of `key`.
    #[must_use]
    pub fn fail_get(mut self, key: &str) -> Self {
        self.fail_get.insert(key.to_string());
        self
    }

    /// Fail every `put` of `key`.
    #[must_use]
    pub fn fail_put(mut self, key: &str) -> Self {
        self.fail_put.insert(key.to_string());
        self
    }

    /// Fail every `delete` of `key`.
    #[must_use]
    pub fn fail_delete(mut self, key: &str) -> Self {
        self.fail_delete.insert(key.to_string());
        self
    }

    /// Let `n` puts through, then fail every later one.
    #[must_use]
    pub fn fail_after_puts(mut self, n: usize) -> Self {
        self.puts_before_failure = Some(n);
        self
    }

    /// Fail every indexed query.
    #[must_use]
    pub fn fail_queries(mut self) -> Self {
        self.fail_query = true;
        self
    }

    /// Stop injecting put failures for `key`.
    pub fn heal_put(&mut self, key: &str) {
        self.fail_put.remove(key);
    }

    /// Number of puts that reached the inner store.
    #[must_use]
    pub fn puts(&self) -> usize {
        self.puts
    }

    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

fn injected(op: &str, key: &str) -> LedgerError {
    LedgerError::Store {
        reason: format!("injected {op} failure on {key:?}"),
    }
}

impl<S: Store> Store for FaultyStore<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.fail_get.contains(key) {
            return Err(injected("get", key));
        }
        self.inner.get(key)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        if self.fail_put.contains(key) {
            return Err(injected("put", key));
        }
        if self.puts_before_failure.is_some_and(|n| self.puts >= n) {
            return Err(injected("put", key));
        }
        self.inner.put(key, value)?;
        self.puts += 1;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        if self.fail_delete.contains(key) {
            return Err(injected("delete", key));
        }
        self.inner.delete(key)
    }

    fn scan(&self, start: &str, end: &str) -> Result<Cursor<KeyValue>> {
        self.inner.scan(start, end)
    }

    fn query(&self, expr: &str) -> Result<Cursor<KeyValue>> {
        if self.fail_query {
            return Err(injected("query", expr));
        }
        self.inner.query(expr)
    }

    fn history(&self, key: &str) -> Result<Cursor<HistoryEntry>> {
        self.inner.history(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn injected_put_leaves_inner_untouched() {
        let mut store = FaultyStore::new(MemoryStore::new()).fail_put("a");
        assert!(store.put("a", b"1".to_vec()).is_err());
        store.put("b", b"1".to_vec()).unwrap();
        assert_eq!(store.inner().get("a").unwrap(), None);
        assert_eq!(store.puts(), 1);

        store.heal_put("a");
        store.put("a", b"1".to_vec()).unwrap();
    }

    #[test]
    fn fail_after_n_puts() {
        let mut store = FaultyStore::new(MemoryStore::new()).fail_after_puts(2);
        store.put("a", b"1".to_vec()).unwrap();
        store.put("b", b"1".to_vec()).unwrap();
        assert!(store.put("c", b"1".to_vec()).is_err());
        assert_eq!(store.into_inner().len(), 2);
    }

    #[test]
    fn queries_and_gets_fail_on_demand() {
        let store = FaultyStore::new(MemoryStore::new())
            .fail_queries()
            .fail_get("k");
        assert!(store.query(r#"{"selector":{}}"#).is_err());
        assert!(store.get("k").is_err());
        assert_eq!(store.get("other").unwrap(), None);
    }
}
