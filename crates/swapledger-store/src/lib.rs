//! # swapledger-store
//!
//! The seam between SwapLedger and the versioned key-value ledger it runs
//! on. The core only ever talks to the [`Store`] trait; a host embeds
//! SwapLedger by implementing it over its own state database.
//!
//! ## Contents
//!
//! - [`Store`]: synchronous, ordered get/put/delete, range scans, partial
//!   composite-key scans, indexed queries and per-key history
//! - [`Cursor`]: RAII scan handle, released on exhaustion, `close()` or drop
//! - [`composite_key`] / [`split_composite_key`]: NUL-delimited composite keys
//! - [`MemoryStore`]: the reference in-memory adapter, with a small
//!   selector query language and JSON snapshots
//! - `FaultyStore` (feature `test-helpers`): fault injection for tests

pub mod composite;
pub mod cursor;
#[cfg(any(test, feature = "test-helpers"))]
pub mod faulty;
pub mod memory;
pub mod selector;
pub mod store;

pub use composite::{MAX_UNICODE_RUNE, composite_key, is_composite_key, split_composite_key};
pub use cursor::Cursor;
#[cfg(any(test, feature = "test-helpers"))]
pub use faulty::FaultyStore;
pub use memory::{MemoryStore, Snapshot, TxContext};
pub use selector::Selector;
pub use store::{HistoryEntry, KeyValue, Store};
