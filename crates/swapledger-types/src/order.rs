//! Open-order types for the barter book.
//!
//! An [`OpenOrder`] is a standing offer: the proposer gives away an asset
//! matching `offer` in exchange for one matching `want`. Two descriptors are
//! equal when both category and size are equal; the matcher uses nothing
//! else.

use serde::{Deserialize, Serialize};

use crate::{Category, OrderId, OwnerId, constants};

fn order_doc_type() -> String {
    constants::ORDER_DOC_TYPE.to_string()
}

/// `{category, size}` description of a wanted or offered asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Descriptor {
    pub category: Category,
    pub size: u64,
}

impl Descriptor {
    #[must_use]
    pub fn new(category: Category, size: u64) -> Self {
        Self { category, size }
    }
}

impl std::fmt::Display for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.size)
    }
}

/// A standing barter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOrder {
    /// Record kind tag used by indexed queries in the keyed layout.
    #[serde(rename = "docType", default = "order_doc_type")]
    pub doc_type: String,
    pub id: OrderId,
    pub proposer: OwnerId,
    pub want: Descriptor,
    pub offer: Descriptor,
}

impl OpenOrder {
    #[must_use]
    pub fn new(id: OrderId, proposer: OwnerId, want: Descriptor, offer: Descriptor) -> Self {
        Self {
            doc_type: order_doc_type(),
            id,
            proposer,
            want,
            offer,
        }
    }

    /// `true` if `giver`'s offer is exactly what this order wants.
    #[must_use]
    pub fn wants_offer_of(&self, giver: &OpenOrder) -> bool {
        self.want == giver.offer
    }

    /// Exact 2-cycle: each side wants precisely what the other offers.
    #[must_use]
    pub fn is_mutual_with(&self, other: &OpenOrder) -> bool {
        self.wants_offer_of(other) && other.wants_offer_of(self)
    }
}

impl std::fmt::Display for OpenOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order[{}] {} wants {} offers {}",
            self.id, self.proposer, self.want, self.offer
        )
    }
}

/// The aggregate order-book record: every open order under one key.
/// Unknown fields are rejected so a foreign record never reads as an empty
/// book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderBookRecord {
    #[serde(default)]
    pub open_trades: Vec<OpenOrder>,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Descriptor {
    pub fn dummy(category: &str, size: u64) -> Self {
        Self::new(Category::parse(category).unwrap(), size)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl OpenOrder {
    /// `proposer` wants `want` and offers `offer`, given as `(category, size)`.
    pub fn dummy(id: u64, proposer: &str, want: (&str, u64), offer: (&str, u64)) -> Self {
        Self::new(
            OrderId(id),
            OwnerId::parse(proposer).unwrap(),
            Descriptor::dummy(want.0, want.1),
            Descriptor::dummy(offer.0, offer.1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutual_orders() {
        let a = OpenOrder::dummy(1, "alice", ("red", 10), ("blue", 5));
        let b = OpenOrder::dummy(2, "bob", ("blue", 5), ("red", 10));
        assert!(a.is_mutual_with(&b));
        assert!(b.is_mutual_with(&a));
    }

    #[test]
    fn size_mismatch_is_not_mutual() {
        let a = OpenOrder::dummy(1, "alice", ("red", 10), ("blue", 5));
        let b = OpenOrder::dummy(2, "bob", ("blue", 5), ("red", 11));
        assert!(b.wants_offer_of(&a));
        assert!(!a.is_mutual_with(&b));
    }

    #[test]
    fn aggregate_record_shape() {
        let book = OrderBookRecord {
            open_trades: vec![OpenOrder::dummy(1, "alice", ("red", 10), ("blue", 5))],
        };
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["open_trades"][0]["docType"], "openOrder");
        assert_eq!(json["open_trades"][0]["want"]["category"], "red");
        assert_eq!(json["open_trades"][0]["offer"]["size"], 5);
    }

    #[test]
    fn empty_aggregate_record_decodes() {
        let book: OrderBookRecord = serde_json::from_str("{}").unwrap();
        assert!(book.open_trades.is_empty());
    }

    #[test]
    fn foreign_record_is_not_a_book() {
        let asset = r#"{"docType":"asset","id":"m1","category":"red","size":1,"owner":"tom"}"#;
        assert!(serde_json::from_str::<OrderBookRecord>(asset).is_err());
    }

    #[test]
    fn display() {
        let a = OpenOrder::dummy(9, "alice", ("red", 10), ("blue", 5));
        assert_eq!(format!("{a}"), "Order[9] alice wants red/10 offers blue/5");
    }
}
