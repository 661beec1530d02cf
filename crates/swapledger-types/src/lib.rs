//! # swapledger-types
//!
//! Shared types, errors, and configuration for **SwapLedger**.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`AssetId`], [`OwnerId`], [`Category`], [`OrderId`]
//! - **Asset model**: [`Asset`]
//! - **Order model**: [`OpenOrder`], [`Descriptor`], [`OrderBookRecord`]
//! - **Swap model**: [`SwapParty`], [`SwapLeg`], [`SwapReceipt`], [`ExecutedCycle`], [`SkippedCycle`], [`MatchReport`]
//! - **Record codec**: [`encode_record`], [`decode_record`]
//! - **Configuration**: [`LedgerConfig`], [`BookConfig`], [`SwapPolicy`], [`LogConfig`]
//! - **Errors**: [`LedgerError`] with `SL_ERR_` prefix codes, [`ErrorKind`]
//! - **Constants**: well-known keys and doc types

pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;
pub mod record;
pub mod swap;

// Re-export all primary types at crate root for ergonomic imports:
//   use swapledger_types::{Asset, OpenOrder, LedgerError, ...};

pub use asset::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use record::*;
pub use swap::*;

// Constants are accessed via `swapledger_types::constants::FOO`
// (not re-exported to avoid name collisions).
