//! Dispatcher entry points and their arities.

use std::fmt;
use std::str::FromStr;

use swapledger_types::LedgerError;

/// Every operation a caller can invoke by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Create,
    Read,
    Delete,
    Transfer,
    TransferByCategory,
    RangeList,
    CategoryQuery,
    OwnerQuery,
    AdHocQuery,
    HistoryQuery,
    OrderPost,
    OrderList,
    OrderRead,
    OrderRemove,
    OrderClear,
    PairwiseMatch,
    TripartiteMatch,
    Swap,
    SwapTri,
}

impl Function {
    pub const ALL: [Self; 19] = [
        Self::Create,
        Self::Read,
        Self::Delete,
        Self::Transfer,
        Self::TransferByCategory,
        Self::RangeList,
        Self::CategoryQuery,
        Self::OwnerQuery,
        Self::AdHocQuery,
        Self::HistoryQuery,
        Self::OrderPost,
        Self::OrderList,
        Self::OrderRead,
        Self::OrderRemove,
        Self::OrderClear,
        Self::PairwiseMatch,
        Self::TripartiteMatch,
        Self::Swap,
        Self::SwapTri,
    ];

    /// Wire name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Delete => "delete",
            Self::Transfer => "transfer",
            Self::TransferByCategory => "transfer-by-category",
            Self::RangeList => "range-list",
            Self::CategoryQuery => "category-query",
            Self::OwnerQuery => "owner-query",
            Self::AdHocQuery => "ad-hoc-query",
            Self::HistoryQuery => "history-query",
            Self::OrderPost => "order-post",
            Self::OrderList => "order-list",
            Self::OrderRead => "order-read",
            Self::OrderRemove => "order-remove",
            Self::OrderClear => "order-clear",
            Self::PairwiseMatch => "pairwise-match",
            Self::TripartiteMatch => "tripartite-match",
            Self::Swap => "swap",
            Self::SwapTri => "swap-tri",
        }
    }

    /// Exact number of positional arguments.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::OrderClear | Self::PairwiseMatch | Self::TripartiteMatch => 0,
            Self::Read
            | Self::Delete
            | Self::CategoryQuery
            | Self::OwnerQuery
            | Self::AdHocQuery
            | Self::HistoryQuery
            | Self::OrderRead
            | Self::OrderRemove => 1,
            Self::Transfer | Self::TransferByCategory | Self::RangeList | Self::OrderList => 2,
            Self::Create => 4,
            Self::OrderPost => 5,
            Self::Swap => 6,
            Self::SwapTri => 9,
        }
    }

    /// Reject an argument list of the wrong length.
    pub fn check_arity(self, actual: usize) -> Result<(), LedgerError> {
        if actual == self.arity() {
            Ok(())
        } else {
            Err(LedgerError::WrongArity {
                function: self.name().to_string(),
                expected: self.arity(),
                actual,
            })
        }
    }
}

impl FromStr for Function {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| LedgerError::UnknownFunction(s.to_string()))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
