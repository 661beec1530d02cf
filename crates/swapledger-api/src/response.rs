//! Dispatcher responses.

use serde::{Deserialize, Serialize};
use swapledger_types::{ErrorKind, LedgerError};

/// Response status codes.
pub mod status {
    pub const OK: u16 = 200;
    pub const INVALID_ARGUMENT: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const ALREADY_EXISTS: u16 = 409;
    pub const STORE_FAILURE: u16 = 500;
    pub const PARTIAL_COMPLETION: u16 = 520;
}

/// Outcome of one invocation. `payload` is empty on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub message: String,
    pub payload: String,
}

impl Response {
    #[must_use]
    pub fn success(payload: impl Into<String>) -> Self {
        Self {
            status: status::OK,
            message: String::new(),
            payload: payload.into(),
        }
    }

    #[must_use]
    pub fn error(err: &LedgerError) -> Self {
        let status = match err.kind() {
            ErrorKind::InvalidArgument => status::INVALID_ARGUMENT,
            ErrorKind::NotFound => status::NOT_FOUND,
            ErrorKind::AlreadyExists => status::ALREADY_EXISTS,
            ErrorKind::StoreFailure => status::STORE_FAILURE,
            ErrorKind::PartialCompletion => status::PARTIAL_COMPLETION,
        };
        Self {
            status,
            message: err.to_string(),
            payload: String::new(),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == status::OK
    }
}

impl From<Result<String, LedgerError>> for Response {
    fn from(result: Result<String, LedgerError>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => Self::error(&err),
        }
    }
}
