//! Registry capability boundary.
//!
//! The on-chain registry is an external capability with fixed semantics:
//! a hash can be registered exactly once, and its proof can always be
//! read. Implementations classify their own failures into
//! [`LedgerError`] variants; callers never parse error text.

use async_trait::async_trait;

use attest_core::{ContentHash, LedgerProof, LedgerReceipt};

use crate::error::Result;
use crate::tx::SignedTx;

/// Estimated resource cost of a transaction.
///
/// Estimates go stale as ledger conditions change, so they are produced
/// immediately before submission and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEstimate {
    /// Resource units the transaction is expected to consume.
    pub units: u64,
}

/// The on-chain registry capability.
///
/// Implementations must be thread-safe (Send + Sync).
///
/// # Design Notes
///
/// - **First writer wins**: `submit` for an already-registered hash fails
///   with `Rejected`; the registry's state transition is atomic, so two
///   concurrent submissions of the same hash produce exactly one proof.
/// - **Non-failing reads**: `get_proof` returns the zero-owner sentinel
///   for unknown hashes rather than an error.
/// - **Blocking submission**: `submit` resolves once the transaction is
///   included (or refused); it is the dominant latency source.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Estimate the cost of submitting `tx` under current conditions.
    async fn estimate_fee(&self, tx: &SignedTx) -> Result<FeeEstimate>;

    /// Submit a signed registration and block until inclusion.
    async fn submit(&self, tx: SignedTx, fee: FeeEstimate) -> Result<LedgerReceipt>;

    /// Read the proof for a hash. Absence is the zero-owner proof.
    async fn get_proof(&self, hash: &ContentHash) -> Result<LedgerProof>;
}

/// An in-memory registry for tests and embedding.
///
/// Preserves the real registry's semantics: atomic first-writer-wins
/// registration and immutable proofs. Supports fault injection so callers
/// can exercise unavailability and partial-failure windows.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    use crate::error::LedgerError;

    /// Base cost charged per registration by the in-memory registry.
    const BASE_FEE_UNITS: u64 = 21_000;

    struct RegistryInner {
        proofs: HashMap<ContentHash, LedgerProof>,
        next_block: u64,
        offline: bool,
        /// Number of upcoming proof reads to fail, for partial-failure tests.
        failing_proof_reads: u32,
    }

    /// In-memory registry implementation.
    pub struct InMemoryRegistry {
        inner: Mutex<RegistryInner>,
    }

    impl InMemoryRegistry {
        /// Create an empty registry.
        pub fn new() -> Self {
            Self {
                inner: Mutex::new(RegistryInner {
                    proofs: HashMap::new(),
                    next_block: 1,
                    offline: false,
                    failing_proof_reads: 0,
                }),
            }
        }

        /// Simulate the node going down (or coming back).
        pub async fn set_offline(&self, offline: bool) {
            self.inner.lock().await.offline = offline;
        }

        /// Make the next `count` proof reads fail as unavailable.
        pub async fn fail_next_proof_reads(&self, count: u32) {
            self.inner.lock().await.failing_proof_reads = count;
        }

        /// Number of proofs recorded so far.
        pub async fn proof_count(&self) -> usize {
            self.inner.lock().await.proofs.len()
        }
    }

    impl Default for InMemoryRegistry {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Registry for InMemoryRegistry {
        async fn estimate_fee(&self, _tx: &SignedTx) -> Result<FeeEstimate> {
            let inner = self.inner.lock().await;
            if inner.offline {
                return Err(LedgerError::Unavailable("registry offline".into()));
            }
            // Cost grows with registry occupancy, enough to make stale
            // estimates observable in tests.
            Ok(FeeEstimate {
                units: BASE_FEE_UNITS + inner.proofs.len() as u64,
            })
        }

        async fn submit(&self, tx: SignedTx, _fee: FeeEstimate) -> Result<LedgerReceipt> {
            let mut inner = self.inner.lock().await;
            if inner.offline {
                return Err(LedgerError::Unavailable("registry offline".into()));
            }

            tx.verify()?;

            let hash = tx.body.hash;
            if inner.proofs.contains_key(&hash) {
                return Err(LedgerError::Rejected {
                    reason: format!("hash {} already registered", hash),
                });
            }

            let proof = LedgerProof {
                owner: tx.body.sender,
                block_timestamp: now_millis(),
            };
            inner.proofs.insert(hash, proof);

            let block_number = inner.next_block;
            inner.next_block += 1;

            Ok(LedgerReceipt {
                tx_hash: tx.tx_hash()?,
                block_number,
            })
        }

        async fn get_proof(&self, hash: &ContentHash) -> Result<LedgerProof> {
            let mut inner = self.inner.lock().await;
            if inner.offline {
                return Err(LedgerError::Unavailable("registry offline".into()));
            }
            if inner.failing_proof_reads > 0 {
                inner.failing_proof_reads -= 1;
                return Err(LedgerError::Unavailable("proof read failed".into()));
            }
            Ok(inner
                .proofs
                .get(hash)
                .copied()
                .unwrap_or_else(LedgerProof::absent))
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
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryRegistry;
    use super::*;
    use crate::error::LedgerError;
    use crate::signer::Keypair;

    fn signed(hash_byte: u8, seed: u8) -> SignedTx {
        let keypair = Keypair::from_seed(&[seed; 32]);
        SignedTx::register(ContentHash::from_bytes([hash_byte; 32]), &keypair).unwrap()
    }

    #[tokio::test]
    async fn test_register_once_then_reject() {
        let registry = InMemoryRegistry::new();
        let tx = signed(0xaa, 1);
        let hash = tx.body.hash;

        let fee = registry.estimate_fee(&tx).await.unwrap();
        let receipt = registry.submit(tx.clone(), fee).await.unwrap();
        assert_eq!(receipt.block_number, 1);

        let proof = registry.get_proof(&hash).await.unwrap();
        assert!(!proof.is_absent());

        // Second submission of the same hash, even by another signer.
        let other = signed(0xaa, 2);
        let err = registry.submit(other, fee).await.unwrap_err();
        assert!(err.is_rejection());

        // The proof never changes.
        assert_eq!(registry.get_proof(&hash).await.unwrap(), proof);
    }

    #[tokio::test]
    async fn test_unknown_hash_has_absent_proof() {
        let registry = InMemoryRegistry::new();
        let proof = registry
            .get_proof(&ContentHash::from_bytes([0x11; 32]))
            .await
            .unwrap();
        assert!(proof.is_absent());
    }

    #[tokio::test]
    async fn test_offline_is_unavailable_not_rejected() {
        let registry = InMemoryRegistry::new();
        registry.set_offline(true).await;

        let tx = signed(0xbb, 1);
        let err = registry.estimate_fee(&tx).await.unwrap_err();
        assert!(matches!(err, LedgerError::Unavailable(_)));

        registry.set_offline(false).await;
        let fee = registry.estimate_fee(&tx).await.unwrap();
        registry.submit(tx, fee).await.unwrap();
    }

    #[tokio::test]
    async fn test_injected_proof_read_failure() {
        let registry = InMemoryRegistry::new();
        let hash = ContentHash::from_bytes([0xcc; 32]);

        registry.fail_next_proof_reads(1).await;
        assert!(registry.get_proof(&hash).await.is_err());
        // Only the requested number of reads fail.
        assert!(registry.get_proof(&hash).await.unwrap().is_absent());
    }
}
