//! Verification status derivation.
//!
//! The entire semantic contract of verification is this decision table:
//!
//! | ledger owner | off-chain record | status               |
//! |--------------|------------------|----------------------|
//! | zero         | (not consulted)  | `NotFound`           |
//! | non-zero     | found            | `VerifiedOk`         |
//! | non-zero     | missing          | `VerifiedOnChainOnly`|
//!
//! On-chain presence alone rules `NotFound` in or out. The off-chain
//! store is advisory metadata and never counts as proof of registration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::proof::LedgerProof;

/// Combined trust status of a hash across both stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// No on-chain registration exists for this hash.
    NotFound,
    /// Registered on-chain and known to the metadata store.
    VerifiedOk,
    /// Registered on-chain but unknown off-chain (e.g. registered by a
    /// system that does not track metadata here).
    VerifiedOnChainOnly,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerificationStatus::NotFound => "NOT_FOUND",
            VerificationStatus::VerifiedOk => "VERIFIED_OK",
            VerificationStatus::VerifiedOnChainOnly => "VERIFIED_ON_CHAIN_ONLY",
        };
        write!(f, "{}", s)
    }
}

/// Derive the verification status from a proof and the off-chain lookup
/// outcome.
///
/// Callers must not consult the store at all when the proof is absent;
/// `record_found` is ignored in that case so a stray off-chain record can
/// never upgrade an unregistered hash.
pub fn derive_status(proof: &LedgerProof, record_found: bool) -> VerificationStatus {
    if proof.is_absent() {
        VerificationStatus::NotFound
    } else if record_found {
        VerificationStatus::VerifiedOk
    } else {
        VerificationStatus::VerifiedOnChainOnly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::OwnerAddress;

    fn present_proof() -> LedgerProof {
        LedgerProof {
            owner: OwnerAddress::from_bytes([9; 20]),
            block_timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_absent_proof_is_not_found() {
        let proof = LedgerProof::absent();
        assert_eq!(derive_status(&proof, false), VerificationStatus::NotFound);
        // A stray off-chain record never upgrades an absent proof.
        assert_eq!(derive_status(&proof, true), VerificationStatus::NotFound);
    }

    #[test]
    fn test_present_proof_with_record() {
        assert_eq!(
            derive_status(&present_proof(), true),
            VerificationStatus::VerifiedOk
        );
    }

    #[test]
    fn test_present_proof_without_record() {
        assert_eq!(
            derive_status(&present_proof(), false),
            VerificationStatus::VerifiedOnChainOnly
        );
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&VerificationStatus::VerifiedOnChainOnly).unwrap();
        assert_eq!(json, "\"VERIFIED_ON_CHAIN_ONLY\"");
        assert_eq!(VerificationStatus::NotFound.to_string(), "NOT_FOUND");
    }
}
