//! System-wide constants for SwapLedger.

/// `docType` tag written into every asset record.
pub const ASSET_DOC_TYPE: &str = "asset";

/// `docType` tag written into every keyed open-order record.
pub const ORDER_DOC_TYPE: &str = "openOrder";

/// Object type of the category secondary index composite keys.
pub const CATEGORY_INDEX: &str = "category~id";

/// Value stored under every index key. An empty value would read back as
/// absent, so a single NUL byte is used.
pub const INDEX_SENTINEL: &[u8] = &[0x00];

/// Default key of the aggregate order-book record.
pub const DEFAULT_ORDER_BOOK_KEY: &str = "_opentrades";

/// Default key holding the last issued order id.
pub const DEFAULT_ORDER_SEQUENCE_KEY: &str = "_ordersequence";

/// Key prefix of keyed open-order records.
pub const ORDER_KEY_PREFIX: &str = "openOrder";

/// Width of the zero-padded order id in keyed order records, so that
/// lexicographic key order equals numeric id order.
pub const ORDER_ID_WIDTH: usize = 20;

/// Default `tracing` filter directive for the CLI host.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "SwapLedger";
