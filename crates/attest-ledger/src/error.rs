//! Error types for the ledger module.

use thiserror::Error;

/// Errors that can occur against the on-chain registry.
///
/// The split between [`Rejected`](LedgerError::Rejected) and
/// [`Unavailable`](LedgerError::Unavailable) is structural: registry
/// implementations classify their own failures, so callers branch on the
/// variant and never on message text. Message text is diagnostic detail
/// only.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger itself refused the transaction (contract-level revert,
    /// most commonly a hash that is already registered on-chain). Not
    /// retryable; the caller should re-verify instead.
    #[error("ledger rejected transaction: {reason}")]
    Rejected { reason: String },

    /// The node or transport failed. Retryable with backoff.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// Transaction could not be canonically encoded.
    #[error("transaction encoding error: {0}")]
    Encoding(String),
}

impl LedgerError {
    /// True for contract-level refusals, false for infrastructure failures.
    pub fn is_rejection(&self) -> bool {
        matches!(self, LedgerError::Rejected { .. })
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
