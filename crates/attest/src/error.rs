//! Error types for the Notary.
//!
//! Every downstream failure is re-classified here before it reaches a
//! caller: the error variant carries the decision (retry, re-verify,
//! fix the input) and the phase says where the flow stopped. Raw
//! transport text is diagnostic detail only, never a branching signal.

use attest_core::{DocumentRecord, HashFormatError};
use attest_ledger::LedgerError;
use attest_store::StoreError;
use std::fmt;
use thiserror::Error;

/// The protocol phase an operation failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Validating and normalizing the raw hash.
    Canonicalize,
    /// Reading the off-chain record (duplicate check or verification lookup).
    MetadataLookup,
    /// Submitting the registration transaction.
    LedgerSubmit,
    /// Reading the proof back from the ledger.
    ProofQuery,
    /// Writing the off-chain record.
    Persist,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Canonicalize => "hash canonicalization",
            Phase::MetadataLookup => "metadata lookup",
            Phase::LedgerSubmit => "ledger submission",
            Phase::ProofQuery => "proof query",
            Phase::Persist => "metadata persistence",
        };
        write!(f, "{}", s)
    }
}

/// Errors that can occur during Notary operations.
#[derive(Debug, Error)]
pub enum NotaryError {
    /// The supplied hash is not a 64-character hex digest. Caller error,
    /// not retried.
    #[error("invalid document hash: {0}")]
    InvalidHash(#[from] HashFormatError),

    /// A confirmed registration already exists for this hash. The
    /// existing record is returned; the caller should verify instead.
    #[error("document already registered")]
    AlreadyRegistered { record: Box<DocumentRecord> },

    /// The ledger refused the registration (most commonly a concurrent
    /// duplicate). The caller should re-verify rather than retry.
    #[error("ledger rejected registration during {phase}: {reason}")]
    LedgerRejected { phase: Phase, reason: String },

    /// The ledger node could not be reached. Retryable with backoff.
    #[error("ledger unavailable during {phase}: {detail}")]
    LedgerUnavailable { phase: Phase, detail: String },

    /// The metadata store failed. Retryable with backoff.
    #[error("metadata store unavailable during {phase}: {detail}")]
    StoreUnavailable { phase: Phase, detail: String },
}

impl NotaryError {
    pub(crate) fn ledger(phase: Phase, e: LedgerError) -> Self {
        match e {
            LedgerError::Rejected { reason } => NotaryError::LedgerRejected { phase, reason },
            other => NotaryError::LedgerUnavailable {
                phase,
                detail: other.to_string(),
            },
        }
    }

    pub(crate) fn store(phase: Phase, e: StoreError) -> Self {
        NotaryError::StoreUnavailable {
            phase,
            detail: e.to_string(),
        }
    }

    /// True for infrastructure failures worth retrying with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NotaryError::LedgerUnavailable { .. } | NotaryError::StoreUnavailable { .. }
        )
    }
}

/// Result type for Notary operations.
pub type Result<T> = std::result::Result<T, NotaryError>;
