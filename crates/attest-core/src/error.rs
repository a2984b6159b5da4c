//! Error types for attest core.

use thiserror::Error;

/// Errors raised when a raw hash string fails canonicalization.
///
/// Every variant means the same thing to a caller: the input is not a
/// 64-character hex digest and cannot be registered or verified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashFormatError {
    #[error("invalid hash length: expected 64 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex character {found:?} at position {position}")]
    InvalidCharacter { position: usize, found: char },
}

/// Violations of the document record invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A record flagged as registered is missing one of its ledger fields.
    #[error("registered record {hash} is missing ledger field {field}")]
    MissingLedgerField { hash: String, field: &'static str },
}
