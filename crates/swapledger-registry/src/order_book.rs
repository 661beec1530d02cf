//! Open-order book.
//!
//! Two physical layouts behind one logical view, an id-ordered
//! `Vec<OpenOrder>`:
//!
//! - **Aggregate**: every order inside one `{"open_trades": [...]}` record
//!   under the configured aggregate key. An absent record is an empty book.
//! - **Keyed**: one record per order under `openOrder<20-digit id>`, found
//!   with a `docType` query.
//!
//! Callers, the matcher included, only ever see the logical view.

use std::collections::BTreeSet;

use swapledger_store::Store;
use swapledger_types::{
    BookConfig, BookLayout, Descriptor, LedgerError, OpenOrder, OrderBookRecord, OrderId, OwnerId,
    Result, constants, decode_record, encode_record,
};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::query;
use crate::sequencer::OrderSequencer;

/// Record key of an order in the keyed layout.
#[must_use]
pub fn order_key(id: OrderId) -> String {
    format!(
        "{}{:0width$}",
        constants::ORDER_KEY_PREFIX,
        id.0,
        width = constants::ORDER_ID_WIDTH
    )
}

/// Order-book operations over a borrowed store.
pub struct OrderBook<'a, S: Store + ?Sized> {
    store: &'a mut S,
    config: &'a BookConfig,
}

impl<'a, S: Store + ?Sized> OrderBook<'a, S> {
    pub fn new(store: &'a mut S, config: &'a BookConfig) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub fn layout(&self) -> BookLayout {
        self.config.layout
    }

    // -----------------------------------------------------------------
    // Layout plumbing
    // -----------------------------------------------------------------

    fn load_aggregate(&self) -> Result<Vec<OpenOrder>> {
        let key = &self.config.aggregate_key;
        match self.store.get(key)? {
            Some(bytes) => Ok(decode_record::<OrderBookRecord>(key, &bytes)?.open_trades),
            None => Ok(Vec::new()),
        }
    }

    fn save_aggregate(&mut self, open_trades: Vec<OpenOrder>) -> Result<()> {
        let record = OrderBookRecord { open_trades };
        self.store
            .put(&self.config.aggregate_key, encode_record(&record)?)
    }

    fn load_keyed(&self) -> Result<Vec<OpenOrder>> {
        let cursor = self
            .store
            .query(&query::doc_type_selector(constants::ORDER_DOC_TYPE))?;
        let mut orders: Vec<OpenOrder> = query::to_keyed(cursor)?.into_values().collect();
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    /// Every open order, in id order.
    pub fn open_orders(&self) -> Result<Vec<OpenOrder>> {
        match self.config.layout {
            BookLayout::Aggregate => self.load_aggregate(),
            BookLayout::Keyed => self.load_keyed(),
        }
    }

    // -----------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------

    /// Post a new order with an id from the order sequencer.
    ///
    /// # Errors
    /// `DuplicateOrder` if an order with the issued id is already present,
    /// which only happens when the sequence record was rewound externally.
    /// The sequence record is advanced before the book is written, so a
    /// failed post still consumes its id.
    pub fn post(
        &mut self,
        clock: &dyn Clock,
        proposer: OwnerId,
        want: Descriptor,
        offer: Descriptor,
    ) -> Result<OpenOrder> {
        let id = OrderSequencer::new(&self.config.sequence_key).next(&mut *self.store, clock)?;
        let order = OpenOrder::new(id, proposer, want, offer);

        match self.config.layout {
            BookLayout::Aggregate => {
                let mut orders = self.load_aggregate()?;
                if orders.iter().any(|o| o.id == id) {
                    return Err(LedgerError::DuplicateOrder(id));
                }
                orders.push(order.clone());
                self.save_aggregate(orders)?;
            }
            BookLayout::Keyed => {
                let key = order_key(id);
                if self.store.get(&key)?.is_some() {
                    return Err(LedgerError::DuplicateOrder(id));
                }
                self.store.put(&key, encode_record(&order)?)?;
            }
        }

        info!(order_id = %id, proposer = %order.proposer, want = %order.want, offer = %order.offer, "Order posted");
        Ok(order)
    }

    /// Orders with `start <= id < end`, in id order.
    pub fn list(&self, start: OrderId, end: OrderId) -> Result<Vec<OpenOrder>> {
        match self.config.layout {
            BookLayout::Aggregate => Ok(self
                .load_aggregate()?
                .into_iter()
                .filter(|o| o.id >= start && o.id < end)
                .collect()),
            BookLayout::Keyed => {
                let cursor = self.store.range(&order_key(start), &order_key(end))?;
                Ok(query::to_keyed::<OpenOrder>(cursor)?.into_values().collect())
            }
        }
    }

    /// One order by id.
    pub fn read(&self, id: OrderId) -> Result<OpenOrder> {
        match self.config.layout {
            BookLayout::Aggregate => self
                .load_aggregate()?
                .into_iter()
                .find(|o| o.id == id)
                .ok_or(LedgerError::OrderNotFound(id)),
            BookLayout::Keyed => {
                let key = order_key(id);
                let bytes = self.store.get(&key)?.ok_or(LedgerError::OrderNotFound(id))?;
                decode_record(&key, &bytes)
            }
        }
    }

    /// Remove the first order with this id and return it.
    pub fn remove_by_id(&mut self, id: OrderId) -> Result<OpenOrder> {
        let removed = match self.config.layout {
            BookLayout::Aggregate => {
                let mut orders = self.load_aggregate()?;
                let pos = orders
                    .iter()
                    .position(|o| o.id == id)
                    .ok_or(LedgerError::OrderNotFound(id))?;
                let removed = orders.remove(pos);
                self.save_aggregate(orders)?;
                removed
            }
            BookLayout::Keyed => {
                let removed = self.read(id)?;
                self.store.delete(&order_key(id))?;
                removed
            }
        };
        info!(order_id = %id, "Order removed");
        Ok(removed)
    }

    /// Remove every open order. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let removed = match self.config.layout {
            BookLayout::Aggregate => {
                let count = self.load_aggregate()?.len();
                self.save_aggregate(Vec::new())?;
                count
            }
            BookLayout::Keyed => {
                let orders = self.load_keyed()?;
                for order in &orders {
                    self.store.delete(&order_key(order.id))?;
                }
                orders.len()
            }
        };
        info!(removed, "Order book cleared");
        Ok(removed)
    }

    /// Drop the orders consumed by a match pass. Ids not in the book are
    /// ignored. Returns how many orders were dropped.
    pub fn retire(&mut self, consumed: &BTreeSet<OrderId>) -> Result<usize> {
        if consumed.is_empty() {
            return Ok(0);
        }
        let retired = match self.config.layout {
            BookLayout::Aggregate => {
                let orders = self.load_aggregate()?;
                let before = orders.len();
                let remaining: Vec<OpenOrder> = orders
                    .into_iter()
                    .filter(|o| !consumed.contains(&o.id))
                    .collect();
                let retired = before - remaining.len();
                self.save_aggregate(remaining)?;
                retired
            }
            BookLayout::Keyed => {
                let mut retired = 0;
                for id in consumed {
                    let key = order_key(*id);
                    if self.store.get(&key)?.is_some() {
                        self.store.delete(&key)?;
                        retired += 1;
                    }
                }
                retired
            }
        };
        debug!(retired, "Consumed orders retired");
        Ok(retired)
    }
}
