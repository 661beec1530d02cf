//! Configuration types for a SwapLedger host.

use serde::{Deserialize, Serialize};

use crate::{LedgerError, Result, constants};

/// Physical layout of the open-order book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookLayout {
    /// Every order inside one record under [`BookConfig::aggregate_key`].
    #[default]
    Aggregate,
    /// One record per order, found through an indexed query on `docType`.
    Keyed,
}

/// Order-book storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub layout: BookLayout,
    /// Key of the aggregate record (ignored in the keyed layout).
    pub aggregate_key: String,
    /// Key holding the last issued order id.
    pub sequence_key: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            layout: BookLayout::default(),
            aggregate_key: constants::DEFAULT_ORDER_BOOK_KEY.to_string(),
            sequence_key: constants::DEFAULT_ORDER_SEQUENCE_KEY.to_string(),
        }
    }
}

impl BookConfig {
    /// `true` if `key` is order-book bookkeeping: the aggregate record, the
    /// sequence record, or anything in the keyed-order key range. Asset ids
    /// must never take such a key.
    #[must_use]
    pub fn reserves(&self, key: &str) -> bool {
        key == self.aggregate_key
            || key == self.sequence_key
            || key.starts_with(constants::ORDER_KEY_PREFIX)
    }
}

/// How swap legs pick the concrete asset to move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapPolicy {
    /// When set, a leg only accepts an asset whose size equals the offered
    /// size; otherwise any asset of the offered category qualifies.
    pub require_exact_size: bool,
}

/// Log output format for the CLI host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration. `RUST_LOG` overrides `filter` when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: constants::DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub book: BookConfig,
    pub swap: SwapPolicy,
    pub log: LogConfig,
}

impl LedgerConfig {
    /// Parse and validate a JSON configuration document. Missing sections
    /// take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| LedgerError::Configuration(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the ledger cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.book.aggregate_key.is_empty() {
            return Err(LedgerError::Configuration(
                "book.aggregate_key must not be empty".into(),
            ));
        }
        if self.book.sequence_key.is_empty() {
            return Err(LedgerError::Configuration(
                "book.sequence_key must not be empty".into(),
            ));
        }
        if self.book.aggregate_key == self.book.sequence_key {
            return Err(LedgerError::Configuration(
                "book.aggregate_key and book.sequence_key must differ".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LedgerConfig::default();
        assert_eq!(cfg.book.layout, BookLayout::Aggregate);
        assert_eq!(cfg.book.aggregate_key, "_opentrades");
        assert!(!cfg.swap.require_exact_size);
        assert_eq!(cfg.log.filter, "info");
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_document_fills_defaults() {
        let cfg = LedgerConfig::from_json_str(r#"{"book":{"layout":"keyed"}}"#).unwrap();
        assert_eq!(cfg.book.layout, BookLayout::Keyed);
        assert_eq!(cfg.book.sequence_key, "_ordersequence");
        assert_eq!(cfg.log.format, LogFormat::Text);
    }

    #[test]
    fn empty_key_rejected() {
        let err = LedgerConfig::from_json_str(r#"{"book":{"aggregate_key":""}}"#).unwrap_err();
        assert!(matches!(err, LedgerError::Configuration(_)));
    }

    #[test]
    fn colliding_keys_rejected() {
        let err = LedgerConfig::from_json_str(
            r#"{"book":{"aggregate_key":"k","sequence_key":"k"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::Configuration(_)));
    }

    #[test]
    fn book_keys_are_reserved() {
        let book = BookConfig {
            aggregate_key: "book".into(),
            ..BookConfig::default()
        };
        assert!(book.reserves("book"));
        assert!(book.reserves("_ordersequence"));
        assert!(book.reserves("openOrder00000000000000001000"));
        assert!(!book.reserves("_opentrades"));
        assert!(!book.reserves("marble1"));
    }

    #[test]
    fn malformed_document_rejected() {
        assert!(LedgerConfig::from_json_str("{not json").is_err());
    }
}
