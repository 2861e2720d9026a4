use thiserror::Error;

/// Unified error type for the entire household-ledger-core library.
///
/// The derivation services never fail; errors come from month parsing,
/// mutation validation and snapshot (de)serialization.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input ───────────────────────────────────────────────────────
    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── Lookups ─────────────────────────────────────────────────────
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Transfer #{index} not found in {month}")]
    TransferNotFound { month: String, index: usize },

    #[error("Recurring item not found: {0}")]
    RecurringNotFound(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    // ── Snapshots ───────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
