//! # swapledger-settlement
//!
//! **Execution plane**: turns swap requests and planned cycles into
//! committed ownership transfers.
//!
//! ## Architecture
//!
//! A swap is a ring of parties, the asset of party `n` moving to party
//! `n + 1`. [`SwapExecutor`] settles one ring:
//! 1. Resolves a concrete asset for every leg before anything is written
//! 2. Commits the legs in ring order
//! 3. On a failed leg, transfers the committed legs back in reverse order
//! 4. Reports `PartialCompletion` only if that compensation also fails
//!
//! [`MatchingEngine`] loads the order book, asks MatchCore for a plan,
//! settles each cycle through the executor and retires the consumed orders.

pub mod engine;
pub mod executor;

pub use engine::MatchingEngine;
pub use executor::SwapExecutor;
