//! # swapledger-matchcore
//!
//! **Pure deterministic cycle planner for SwapLedger.**
//!
//! MatchCore takes the logical order book (an id-ordered list of open
//! orders) and decides which 2-cycles or 3-cycles a matching pass would
//! execute, and in which order. It has:
//!
//! - **Zero side effects**: no store access, no asset resolution
//! - **Deterministic output**: same book in, same plan out
//! - **Generation filtering**: consumed orders are filtered out of the next
//!   generation of the list; indices are never shifted in place
//!
//! Execution of a plan lives in `swapledger-settlement`.

pub mod determinism;
pub mod planner;

pub use determinism::{compute_match_root, match_root_hex, verify_match_root};
pub use planner::{MatchPlan, PlannedCycle, plan, plan_pairwise, plan_tripartite};
