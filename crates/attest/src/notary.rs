//! The Notary: registration and verification over two sources of truth.
//!
//! The Notary is the only component that reads both the ledger and the
//! metadata store and produces a combined view. Registration is a
//! two-phase reconciliation (ledger write, proof read-back, off-chain
//! upsert) because no cross-store transaction exists; the window between
//! phases is an explicit, recoverable state, never a silent one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use attest_core::{
    canonicalize, derive_status, DocumentMeta, DocumentRecord, LedgerProof, LedgerReceipt,
    VerificationStatus,
};
use attest_ledger::LedgerClient;
use attest_store::MetadataStore;

use crate::error::{NotaryError, Phase, Result};

/// Configuration for the Notary.
#[derive(Debug, Clone)]
pub struct NotaryConfig {
    /// Re-query the ledger proof before rejecting a registration as a
    /// duplicate. Off by default: a record flagged registered is trusted
    /// as-is. When enabled, a stale flag (no on-chain proof) falls
    /// through to re-registration instead of rejecting.
    pub confirm_duplicate_on_ledger: bool,
}

impl Default for NotaryConfig {
    fn default() -> Self {
        Self {
            confirm_duplicate_on_ledger: false,
        }
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// The stored record, with ledger fields populated.
    pub record: DocumentRecord,
    /// The inclusion receipt from the ledger.
    pub receipt: LedgerReceipt,
}

/// Outcome of a verification.
///
/// A source that was not consulted yields `None`; fields are never
/// interpolated from the other source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    pub status: VerificationStatus,
    #[serde(rename = "onChainData")]
    pub on_chain: Option<LedgerProof>,
    #[serde(rename = "offChainData")]
    pub off_chain: Option<DocumentRecord>,
}

/// The main Notary struct.
///
/// Holds the two injected capabilities and drives:
/// - Registration: duplicate check, ledger submit, proof read-back,
///   metadata upsert
/// - Verification: proof query, conditional metadata lookup, status
///   derivation
pub struct Notary<S: MetadataStore> {
    /// The off-chain metadata store.
    store: Arc<S>,
    /// The on-chain client with its signing identity.
    ledger: LedgerClient,
    /// Configuration.
    config: NotaryConfig,
}

impl<S: MetadataStore> Notary<S> {
    /// Create a new Notary instance.
    pub fn new(store: S, ledger: LedgerClient, config: NotaryConfig) -> Self {
        Self {
            store: Arc::new(store),
            ledger,
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a document hash: record it on the ledger and persist its
    /// metadata.
    ///
    /// `raw_hash` is the caller's 64-hex digest; it stays the store key
    /// while its canonical form keys the ledger. The record is only ever
    /// flagged registered after both the submission and the proof
    /// read-back succeed; any earlier failure leaves a pending record
    /// behind for recovery.
    pub async fn register(&self, raw_hash: &str, meta: DocumentMeta) -> Result<Registration> {
        let hash = canonicalize(raw_hash)?;

        // Duplicate check against the off-chain store. An unregistered
        // record is not a duplicate: its ledger write never confirmed.
        let existing = self
            .store
            .find_by_hash(raw_hash)
            .await
            .map_err(|e| NotaryError::store(Phase::MetadataLookup, e))?;

        if let Some(record) = existing.as_ref().filter(|r| r.is_registered) {
            let reject = if self.config.confirm_duplicate_on_ledger {
                let proof = self
                    .ledger
                    .query_proof(&hash)
                    .await
                    .map_err(|e| NotaryError::ledger(Phase::MetadataLookup, e))?;
                if proof.is_absent() {
                    tracing::warn!(
                        "record for {} flagged registered but ledger has no proof; re-registering",
                        hash
                    );
                }
                !proof.is_absent()
            } else {
                true
            };

            if reject {
                return Err(NotaryError::AlreadyRegistered {
                    record: Box::new(record.clone()),
                });
            }
        }

        // Capture the metadata before touching the ledger so a failure
        // later leaves a recoverable pending record, never a phantom
        // registration. The capture refreshes descriptive fields only, so
        // a registration confirmed by a racing flow is not downgraded.
        let mut pending = DocumentRecord::pending(raw_hash, meta, now_millis());
        if let Some(prior) = existing.as_ref() {
            pending.created_at = prior.created_at;
        }
        self.store
            .capture_meta(&pending)
            .await
            .map_err(|e| NotaryError::store(Phase::Persist, e))?;

        // The ledger is the serialization point: a concurrent duplicate
        // that slipped past the check above is refused here.
        let receipt = self
            .ledger
            .submit_registration(&hash)
            .await
            .map_err(|e| NotaryError::ledger(Phase::LedgerSubmit, e))?;

        // Read-after-write: the receipt only confirms inclusion, the
        // proof holds the registry's recorded owner and timestamp.
        let proof = self
            .ledger
            .query_proof(&hash)
            .await
            .map_err(|e| NotaryError::ledger(Phase::ProofQuery, e))?;

        if proof.is_absent() {
            return Err(NotaryError::LedgerUnavailable {
                phase: Phase::ProofQuery,
                detail: format!("no proof visible for {} after inclusion", hash),
            });
        }

        let record = pending.into_registered(
            receipt.tx_hash,
            receipt.block_number,
            proof.owner,
            proof.block_timestamp,
            now_millis(),
        );

        self.store
            .upsert(&record)
            .await
            .map_err(|e| NotaryError::store(Phase::Persist, e))?;

        tracing::info!(
            "registered {} in block {} for {}",
            hash,
            receipt.block_number,
            proof.owner
        );

        Ok(Registration { record, receipt })
    }

    /// Verify a document hash against both stores.
    ///
    /// The metadata store is consulted only when the ledger proof shows
    /// a registration; an unconditional lookup would be wasted work and
    /// leak record existence for unregistered hashes.
    pub async fn verify(&self, raw_hash: &str) -> Result<Verification> {
        let hash = canonicalize(raw_hash)?;

        let proof = self
            .ledger
            .query_proof(&hash)
            .await
            .map_err(|e| NotaryError::ledger(Phase::ProofQuery, e))?;

        if proof.is_absent() {
            return Ok(Verification {
                status: VerificationStatus::NotFound,
                on_chain: None,
                off_chain: None,
            });
        }

        let record = self
            .store
            .find_by_hash(raw_hash)
            .await
            .map_err(|e| NotaryError::store(Phase::MetadataLookup, e))?;

        Ok(Verification {
            status: derive_status(&proof, record.is_some()),
            on_chain: Some(proof),
            off_chain: record,
        })
    }

    /// Records whose ledger write has not been confirmed.
    ///
    /// These sit in the window between metadata capture and a confirmed
    /// registration; callers can re-verify or re-register them.
    pub async fn pending_registrations(&self) -> Result<Vec<DocumentRecord>> {
        self.store
            .list_pending()
            .await
            .map_err(|e| NotaryError::store(Phase::MetadataLookup, e))
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
