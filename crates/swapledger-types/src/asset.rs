//! Asset records owned by the registry.
//!
//! An asset is stored as a JSON document under its id. The `category`
//! attribute is also mirrored into the `category~id` secondary index; the
//! owner is not, so ownership transfers never touch the index.

use serde::{Deserialize, Serialize};

use crate::{AssetId, Category, Descriptor, OwnerId, constants};

fn asset_doc_type() -> String {
    constants::ASSET_DOC_TYPE.to_string()
}

/// A uniquely identified, owned, categorized unit of value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Record kind tag used by indexed queries.
    #[serde(rename = "docType", default = "asset_doc_type")]
    pub doc_type: String,
    pub id: AssetId,
    pub category: Category,
    pub size: u64,
    pub owner: OwnerId,
}

impl Asset {
    #[must_use]
    pub fn new(id: AssetId, category: Category, size: u64, owner: OwnerId) -> Self {
        Self {
            doc_type: asset_doc_type(),
            id,
            category,
            size,
            owner,
        }
    }

    /// Whether this asset can serve a leg offering `descriptor`.
    #[must_use]
    pub fn fits(&self, descriptor: &Descriptor, require_exact_size: bool) -> bool {
        self.category == descriptor.category && (!require_exact_size || self.size == descriptor.size)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Asset {
    /// Build an asset from raw strings; panics on invalid input.
    pub fn dummy(id: &str, category: &str, size: u64, owner: &str) -> Self {
        Self::new(
            AssetId::parse(id).unwrap(),
            Category::parse(category).unwrap(),
            size,
            OwnerId::parse(owner).unwrap(),
        )
    }
}
