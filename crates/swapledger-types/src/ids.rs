//! Identifiers used throughout SwapLedger.
//!
//! String identifiers are newtypes so that an owner can never be passed
//! where a category is expected. [`OwnerId`] and [`Category`] are
//! case-normalized (lowercased) when parsed from caller input; records read
//! back from the store are taken verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{LedgerError, Result};

fn require_non_empty(field: &str, raw: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(LedgerError::InvalidArgument {
            reason: format!("{field} must be a non-empty string"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Primary key of an asset record. Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Parse caller input. Fails on the empty string.
    pub fn parse(raw: &str) -> Result<Self> {
        require_non_empty("asset id", raw)?;
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// OwnerId
// ---------------------------------------------------------------------------

/// Name of an asset owner or order proposer, lowercased on input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Parse and lowercase caller input. Fails on the empty string.
    pub fn parse(raw: &str) -> Result<Self> {
        require_non_empty("owner", raw)?;
        Ok(Self(raw.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Asset category (the secondary-index attribute), lowercased on input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Parse and lowercase caller input. Fails on the empty string.
    pub fn parse(raw: &str) -> Result<Self> {
        require_non_empty("category", raw)?;
        Ok(Self(raw.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Open-order identifier. Issued by the order sequencer and strictly
/// increasing within one ledger, so id order is posting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl OrderId {
    /// Parse a decimal order id from caller input.
    pub fn parse(raw: &str) -> Result<Self> {
        raw.parse::<u64>()
            .map(Self)
            .map_err(|_| LedgerError::InvalidArgument {
                reason: format!("order id must be a numeric string, got {raw:?}"),
            })
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a size argument: a non-negative integer in decimal notation.
pub fn parse_size(field: &str, raw: &str) -> Result<u64> {
    require_non_empty(field, raw)?;
    raw.parse::<u64>().map_err(|_| LedgerError::InvalidArgument {
        reason: format!("{field} must be a non-negative numeric string, got {raw:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_category_are_lowercased() {
        assert_eq!(OwnerId::parse("Tom").unwrap().as_str(), "tom");
        assert_eq!(Category::parse("BLUE").unwrap().as_str(), "blue");
    }

    #[test]
    fn asset_id_preserves_case() {
        assert_eq!(AssetId::parse("Marble1").unwrap().as_str(), "Marble1");
    }

    #[test]
    fn empty_inputs_rejected() {
        assert!(matches!(
            AssetId::parse(""),
            Err(LedgerError::InvalidArgument { .. })
        ));
        assert!(OwnerId::parse("").is_err());
        assert!(Category::parse("").is_err());
    }

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("size", "35").unwrap(), 35);
        assert_eq!(parse_size("size", "0").unwrap(), 0);
        assert!(parse_size("size", "-1").is_err());
        assert!(parse_size("size", "ten").is_err());
        assert!(parse_size("size", "").is_err());
    }

    #[test]
    fn order_id_parse_and_next() {
        let id = OrderId::parse("1700000000").unwrap();
        assert_eq!(id, OrderId(1_700_000_000));
        assert_eq!(id.next(), OrderId(1_700_000_001));
        assert!(OrderId::parse("abc").is_err());
    }

    #[test]
    fn ids_serialize_as_bare_values() {
        let owner = OwnerId::parse("jerry").unwrap();
        assert_eq!(serde_json::to_string(&owner).unwrap(), "\"jerry\"");
        assert_eq!(serde_json::to_string(&OrderId(7)).unwrap(), "7");
    }
}
