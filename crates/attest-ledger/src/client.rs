//! The ledger client: one signer driving one registry.

use std::sync::Arc;

use attest_core::{ContentHash, LedgerProof, LedgerReceipt, OwnerAddress};

use crate::error::Result;
use crate::registry::Registry;
use crate::signer::Keypair;
use crate::tx::SignedTx;

/// Submits registrations and reads proofs on behalf of a signing identity.
///
/// The keypair and the registry are injected at construction so tests can
/// substitute fakes for either.
pub struct LedgerClient {
    registry: Arc<dyn Registry>,
    keypair: Keypair,
}

impl LedgerClient {
    /// Create a client for the given registry and signer.
    pub fn new(registry: Arc<dyn Registry>, keypair: Keypair) -> Self {
        Self { registry, keypair }
    }

    /// The address registrations will be recorded under.
    pub fn signer_address(&self) -> OwnerAddress {
        self.keypair.address()
    }

    /// Register `hash` on the ledger and block until inclusion.
    ///
    /// The fee is estimated immediately before submission; a stale
    /// estimate risks either refusal or overpayment, so it is never
    /// reused across submissions. The receipt confirms inclusion only;
    /// authoritative owner and timestamp must be read back via
    /// [`query_proof`](Self::query_proof).
    pub async fn submit_registration(&self, hash: &ContentHash) -> Result<LedgerReceipt> {
        let tx = SignedTx::register(*hash, &self.keypair)?;

        let fee = self.registry.estimate_fee(&tx).await?;
        match self.registry.submit(tx, fee).await {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                if e.is_rejection() {
                    tracing::warn!("registration of {} rejected by ledger: {}", hash, e);
                }
                Err(e)
            }
        }
    }

    /// Read the proof for `hash`. Side-effect free; absence is the
    /// zero-owner sentinel, not an error.
    pub async fn query_proof(&self, hash: &ContentHash) -> Result<LedgerProof> {
        self.registry.get_proof(hash).await
    }
}
