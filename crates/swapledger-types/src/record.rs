//! JSON codec for ledger records.
//!
//! Records are stored as JSON documents so that the store's indexed query
//! can select on their fields. Decoding is always typed: a record that does
//! not match the expected schema is a [`LedgerError::CorruptRecord`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{LedgerError, Result};

/// Serialize a record for storage.
pub fn encode_record<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode the record stored under `key`.
pub fn decode_record<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|err| LedgerError::CorruptRecord {
        key: key.to_string(),
        reason: err.to_string(),
    })
}
