//! # swapledger-api
//!
//! The dispatch surface of **SwapLedger**. A host hands [`Contract::invoke`]
//! a function name and its positional string arguments; the contract checks
//! arity, parses the arguments, runs one registry, order-book or matching
//! operation against the host's store and renders a [`Response`].

pub mod contract;
pub mod function;
pub mod response;

pub use contract::Contract;
pub use function::Function;
pub use response::{Response, status};
