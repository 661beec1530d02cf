//! Error types for SwapLedger.
//!
//! All errors use the `SL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Argument / dispatch errors
//! - 2xx: Asset registry errors
//! - 3xx: Order book errors
//! - 4xx: Matching / swap errors
//! - 5xx: Store errors
//! - 9xx: General / internal errors
//!
//! Every variant also maps onto a coarse [`ErrorKind`], which is what
//! callers branch on.

use thiserror::Error;

use crate::{AssetId, Category, OrderId, OwnerId};

/// Coarse classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing, empty or malformed input.
    InvalidArgument,
    /// The operation target is absent from the store.
    NotFound,
    /// Create collision.
    AlreadyExists,
    /// The underlying store call failed or returned undecodable data.
    StoreFailure,
    /// A bulk or multi-leg operation committed some units, then failed.
    PartialCompletion,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::AlreadyExists => write!(f, "ALREADY_EXISTS"),
            Self::StoreFailure => write!(f, "STORE_FAILURE"),
            Self::PartialCompletion => write!(f, "PARTIAL_COMPLETION"),
        }
    }
}

/// Central error enum for all SwapLedger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // =================================================================
    // Argument / Dispatch Errors (1xx)
    // =================================================================
    /// An argument was empty or malformed.
    #[error("SL_ERR_100: Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A dispatcher entry point received the wrong number of arguments.
    #[error("SL_ERR_101: Incorrect number of arguments for {function}: expecting {expected}, got {actual}")]
    WrongArity {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// The dispatcher does not know the requested function.
    #[error("SL_ERR_102: Received unknown function invocation: {0}")]
    UnknownFunction(String),

    /// The indexed-query expression could not be understood.
    #[error("SL_ERR_103: Invalid query: {reason}")]
    InvalidQuery { reason: String },

    // =================================================================
    // Asset Registry Errors (2xx)
    // =================================================================
    /// No asset is stored under this id.
    #[error("SL_ERR_200: Asset does not exist: {0}")]
    AssetNotFound(AssetId),

    /// An asset with this id already exists.
    #[error("SL_ERR_201: Asset already exists: {0}")]
    AssetAlreadyExists(AssetId),

    /// The owner holds no asset of the requested category.
    #[error("SL_ERR_202: No {category} asset owned by {owner}")]
    OwnedAssetNotFound { owner: OwnerId, category: Category },

    // =================================================================
    // Order Book Errors (3xx)
    // =================================================================
    /// No open order has this id.
    #[error("SL_ERR_300: Open order not found: {0}")]
    OrderNotFound(OrderId),

    /// An open order with this id already exists.
    #[error("SL_ERR_301: Open order already exists: {0}")]
    DuplicateOrder(OrderId),

    // =================================================================
    // Matching / Swap Errors (4xx)
    // =================================================================
    /// Some units of a bulk or multi-leg operation were committed before a
    /// later unit failed. The committed units are NOT rolled back.
    #[error("SL_ERR_400: Partial completion: {completed} of {attempted} units committed before failure: {source}")]
    PartialCompletion {
        completed: usize,
        attempted: usize,
        source: Box<LedgerError>,
    },

    /// A swap request is structurally unusable (e.g. fewer than two parties).
    #[error("SL_ERR_401: Invalid swap: {reason}")]
    InvalidSwap { reason: String },

    // =================================================================
    // Store Errors (5xx)
    // =================================================================
    /// The store adapter reported a failure.
    #[error("SL_ERR_500: Store failure: {reason}")]
    Store { reason: String },

    /// A stored record did not decode into the expected schema.
    #[error("SL_ERR_501: Corrupt record at {key:?}: {reason}")]
    CorruptRecord { key: String, reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SL_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization error while encoding a record or payload.
    #[error("SL_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, empty keys, etc.).
    #[error("SL_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (config or snapshot files).
    #[error("SL_ERR_903: I/O error: {0}")]
    Io(String),
}

impl LedgerError {
    /// The taxonomy bucket this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. }
            | Self::WrongArity { .. }
            | Self::UnknownFunction(_)
            | Self::InvalidQuery { .. }
            | Self::InvalidSwap { .. }
            | Self::Configuration(_) => ErrorKind::InvalidArgument,
            Self::AssetNotFound(_) | Self::OwnedAssetNotFound { .. } | Self::OrderNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::AssetAlreadyExists(_) | Self::DuplicateOrder(_) => ErrorKind::AlreadyExists,
            Self::PartialCompletion { .. } => ErrorKind::PartialCompletion,
            Self::Store { .. }
            | Self::CorruptRecord { .. }
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::Io(_) => ErrorKind::StoreFailure,
        }
    }

    /// Wrap `self` as a partial completion when `completed > 0`; otherwise
    /// nothing was committed and the error is returned unchanged.
    #[must_use]
    pub fn after_committed(self, completed: usize, attempted: usize) -> Self {
        if completed == 0 {
            self
        } else {
            Self::PartialCompletion {
                completed,
                attempted,
                source: Box::new(self),
            }
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = LedgerError::OrderNotFound(OrderId(42));
        let msg = format!("{err}");
        assert!(msg.starts_with("SL_ERR_300"), "Got: {msg}");
        assert!(msg.contains("42"));
    }

    #[test]
    fn kinds_follow_taxonomy() {
        let id = AssetId::parse("m1").unwrap();
        assert_eq!(
            LedgerError::AssetNotFound(id.clone()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LedgerError::AssetAlreadyExists(id).kind(),
            ErrorKind::AlreadyExists
        );
        assert_eq!(
            LedgerError::WrongArity {
                function: "create".into(),
                expected: 4,
                actual: 3,
            }
            .kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            LedgerError::CorruptRecord {
                key: "k".into(),
                reason: "bad".into(),
            }
            .kind(),
            ErrorKind::StoreFailure
        );
    }

    #[test]
    fn after_committed_wraps_only_when_something_committed() {
        let untouched = LedgerError::Store {
            reason: "down".into(),
        }
        .after_committed(0, 3);
        assert_eq!(untouched.kind(), ErrorKind::StoreFailure);

        let partial = LedgerError::Store {
            reason: "down".into(),
        }
        .after_committed(2, 3);
        assert_eq!(partial.kind(), ErrorKind::PartialCompletion);
        let msg = format!("{partial}");
        assert!(msg.contains("2 of 3"), "Got: {msg}");
        assert!(msg.contains("SL_ERR_500"), "Got: {msg}");
    }

    #[test]
    fn all_errors_have_sl_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(LedgerError::UnknownFunction("nope".into())),
            Box::new(LedgerError::DuplicateOrder(OrderId(1))),
            Box::new(LedgerError::Internal("test".into())),
            Box::new(LedgerError::InvalidQuery {
                reason: "no selector".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("SL_ERR_"),
                "Error missing SL_ERR_ prefix: {msg}"
            );
        }
    }
}
