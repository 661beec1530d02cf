//! # swapledger-registry
//!
//! Record-owning layer of **SwapLedger**.
//!
//! ## Components
//!
//! - [`AssetRegistry`]: asset records and the `category~id` secondary index
//! - [`OrderBook`]: open orders in either the aggregate or the keyed layout
//! - [`query`]: turns indexed-query cursors into flat listings or typed
//!   keyed maps
//! - [`OrderSequencer`] and [`Clock`]: strictly increasing order ids
//!
//! Every component borrows the caller's [`swapledger_store::Store`] for the
//! duration of one state transition and holds no other state.

pub mod clock;
pub mod order_book;
pub mod query;
pub mod registry;
pub mod sequencer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use order_book::{OrderBook, order_key};
pub use query::{HistoryRecord, QueryRecord};
pub use registry::AssetRegistry;
pub use sequencer::OrderSequencer;
