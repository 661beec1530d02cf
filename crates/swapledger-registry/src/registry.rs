//! Asset registry.
//!
//! Owns asset records and the `category~id` secondary index. An index
//! entry exists exactly when a live asset with that `(category, id)`
//! exists: both are written by `create`, both removed by `delete`, and
//! neither index key nor category is touched by `transfer`.

use std::collections::{BTreeMap, BTreeSet};

use swapledger_store::{Cursor, KeyValue, Store, composite_key, split_composite_key};
use swapledger_types::{
    Asset, AssetId, BookConfig, Category, Descriptor, LedgerError, OwnerId, Result, SwapLeg,
    constants, decode_record, encode_record,
};
use tracing::{debug, info, warn};

use crate::query;

/// Registry operations over a borrowed store.
pub struct AssetRegistry<'a, S: Store + ?Sized> {
    store: &'a mut S,
    /// Order-book keys that asset ids may not take. The default book
    /// configuration applies when none is given.
    book: Option<&'a BookConfig>,
}

impl<'a, S: Store + ?Sized> AssetRegistry<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store, book: None }
    }

    /// A registry sharing `store` with an order book configured as `book`.
    pub fn with_book(store: &'a mut S, book: &'a BookConfig) -> Self {
        Self {
            store,
            book: Some(book),
        }
    }

    fn is_reserved(&self, id: &AssetId) -> bool {
        match self.book {
            Some(book) => book.reserves(id.as_str()),
            None => BookConfig::default().reserves(id.as_str()),
        }
    }

    /// Read-only access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        self.store
    }

    fn index_key(category: &Category, id: &AssetId) -> Result<String> {
        composite_key(constants::CATEGORY_INDEX, &[category.as_str(), id.as_str()])
    }

    fn require(&self, id: &AssetId) -> Result<Vec<u8>> {
        self.store
            .get(id.as_str())?
            .ok_or_else(|| LedgerError::AssetNotFound(id.clone()))
    }

    /// Register a new asset and its index entry.
    ///
    /// # Errors
    /// `InvalidArgument` if the id is an order-book key. `AssetAlreadyExists`
    /// if the id is taken. If the index write fails the record write is
    /// undone before the error is returned.
    pub fn create(
        &mut self,
        id: AssetId,
        category: Category,
        size: u64,
        owner: OwnerId,
    ) -> Result<Asset> {
        if self.is_reserved(&id) {
            return Err(LedgerError::InvalidArgument {
                reason: format!("asset id {id:?} is reserved for the order book"),
            });
        }
        if self.store.get(id.as_str())?.is_some() {
            return Err(LedgerError::AssetAlreadyExists(id));
        }
        let asset = Asset::new(id, category, size, owner);
        let index_key = Self::index_key(&asset.category, &asset.id)?;

        self.store.put(asset.id.as_str(), encode_record(&asset)?)?;
        if let Err(err) = self.store.put(&index_key, constants::INDEX_SENTINEL.to_vec()) {
            warn!(asset_id = %asset.id, error = %err, "Index write failed, removing record");
            self.store.delete(asset.id.as_str())?;
            return Err(err);
        }

        info!(
            asset_id = %asset.id,
            category = %asset.category,
            size = asset.size,
            owner = %asset.owner,
            "Asset created"
        );
        Ok(asset)
    }

    /// The stored record, byte for byte.
    pub fn read(&self, id: &AssetId) -> Result<Vec<u8>> {
        self.require(id)
    }

    /// The stored record, decoded.
    pub fn read_asset(&self, id: &AssetId) -> Result<Asset> {
        let bytes = self.require(id)?;
        decode_record(id.as_str(), &bytes)
    }

    /// Remove an asset and its index entry.
    ///
    /// Both deletes are always issued; the first failure is reported.
    pub fn delete(&mut self, id: &AssetId) -> Result<Asset> {
        let asset = self.read_asset(id)?;
        let index_key = Self::index_key(&asset.category, &asset.id)?;

        let record = self.store.delete(id.as_str());
        let index = self.store.delete(&index_key);
        record.and(index)?;

        info!(asset_id = %id, category = %asset.category, "Asset deleted");
        Ok(asset)
    }

    /// Hand an asset to `new_owner`. Returns the move that was made.
    pub fn transfer(&mut self, id: &AssetId, new_owner: &OwnerId) -> Result<SwapLeg> {
        let mut asset = self.read_asset(id)?;
        let from = std::mem::replace(&mut asset.owner, new_owner.clone());
        self.store.put(id.as_str(), encode_record(&asset)?)?;

        debug!(asset_id = %id, from = %from, to = %new_owner, "Asset transferred");
        Ok(SwapLeg {
            asset_id: id.clone(),
            from,
            to: new_owner.clone(),
        })
    }

    /// Plain records with keys in `[start, end)`, in key order. Index
    /// entries are never included.
    pub fn list_by_key_range(&self, start: &str, end: &str) -> Result<Cursor<KeyValue>> {
        self.store.range(start, end)
    }

    /// Ids of every asset in `category`, in id order, read from the index
    /// alone.
    pub fn category_ids(&self, category: &Category) -> Result<Vec<AssetId>> {
        let cursor = self
            .store
            .range_by_partial_key(constants::CATEGORY_INDEX, &[category.as_str()])?;
        let mut ids = Vec::new();
        for kv in cursor {
            let kv = kv?;
            let (_, attrs) = split_composite_key(&kv.key)?;
            let raw = attrs.get(1).ok_or_else(|| LedgerError::CorruptRecord {
                key: kv.key.clone(),
                reason: "index key has no id attribute".into(),
            })?;
            ids.push(AssetId::parse(raw)?);
        }
        Ok(ids)
    }

    /// Every asset record in `category`, in id order.
    pub fn list_by_category(&self, category: &Category) -> Result<Vec<Asset>> {
        self.category_ids(category)?
            .iter()
            .map(|id| self.read_asset(id))
            .collect()
    }

    /// Transfer every asset of `category` to `new_owner`.
    ///
    /// # Errors
    /// The first failing transfer aborts the run. Transfers already made are
    /// kept, and the error is then a `PartialCompletion`.
    pub fn transfer_by_category(&mut self, category: &Category, new_owner: &OwnerId) -> Result<usize> {
        let ids = self.category_ids(category)?;
        let attempted = ids.len();

        for (done, id) in ids.iter().enumerate() {
            if let Err(err) = self.transfer(id, new_owner) {
                warn!(
                    category = %category,
                    asset_id = %id,
                    completed = done,
                    attempted,
                    error = %err,
                    "Bulk transfer aborted"
                );
                return Err(err.after_committed(done, attempted));
            }
        }

        info!(category = %category, owner = %new_owner, count = attempted, "Bulk transfer complete");
        Ok(attempted)
    }

    /// Every asset held by `owner`, keyed by record key.
    pub fn owned_by(&self, owner: &OwnerId) -> Result<BTreeMap<String, Asset>> {
        query::to_keyed(self.store.query(&query::owner_selector(owner))?)
    }

    /// First asset (in key order) of `category` held by `owner`.
    pub fn find_owned_by_category(&self, owner: &OwnerId, category: &Category) -> Result<AssetId> {
        self.owned_by(owner)?
            .into_values()
            .find(|asset| &asset.category == category)
            .map(|asset| asset.id)
            .ok_or_else(|| LedgerError::OwnedAssetNotFound {
                owner: owner.clone(),
                category: category.clone(),
            })
    }

    /// Pick the asset `owner` would give up for `offer`: the first one in
    /// key order that fits and is not in `claimed`.
    pub fn resolve_offer(
        &self,
        owner: &OwnerId,
        offer: &Descriptor,
        require_exact_size: bool,
        claimed: &BTreeSet<AssetId>,
    ) -> Result<Asset> {
        self.owned_by(owner)?
            .into_values()
            .find(|asset| asset.fits(offer, require_exact_size) && !claimed.contains(&asset.id))
            .ok_or_else(|| LedgerError::OwnedAssetNotFound {
                owner: owner.clone(),
                category: offer.category.clone(),
            })
    }
}
