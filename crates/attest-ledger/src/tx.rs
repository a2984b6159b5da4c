//! Registration transactions.
//!
//! A registration transaction binds a canonical content hash to the
//! sender's address. The body is encoded as deterministic CBOR, signed
//! over those bytes, and identified by the Blake3 hash of the signed
//! envelope.

use serde::{Deserialize, Serialize};

use attest_core::{ContentHash, OwnerAddress, TxHash};

use crate::error::{LedgerError, Result};
use crate::signer::{Ed25519PublicKey, Ed25519Signature, Keypair};

/// The body of a registration transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationTx {
    /// The canonical hash being registered.
    pub hash: ContentHash,
    /// Address claiming ownership; must match the signing key.
    pub sender: OwnerAddress,
}

impl RegistrationTx {
    /// Canonical CBOR bytes of the body. These are the signed message.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| LedgerError::Encoding(e.to_string()))?;
        Ok(buf)
    }
}

/// A signed registration transaction, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTx {
    pub body: RegistrationTx,
    pub public_key: Ed25519PublicKey,
    pub signature: Ed25519Signature,
}

impl SignedTx {
    /// Build and sign a registration transaction for `hash`.
    pub fn register(hash: ContentHash, keypair: &Keypair) -> Result<Self> {
        let body = RegistrationTx {
            hash,
            sender: keypair.address(),
        };
        let message = body.canonical_bytes()?;
        Ok(Self {
            body,
            public_key: keypair.public_key(),
            signature: keypair.sign(&message),
        })
    }

    /// The transaction hash: Blake3 over the canonical envelope bytes.
    pub fn tx_hash(&self) -> Result<TxHash> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| LedgerError::Encoding(e.to_string()))?;
        Ok(TxHash(*blake3::hash(&buf).as_bytes()))
    }

    /// Check the signature and that the sender address matches the key.
    pub fn verify(&self) -> Result<()> {
        if self.body.sender != self.public_key.address() {
            return Err(LedgerError::Rejected {
                reason: "sender address does not match signing key".into(),
            });
        }
        let message = self.body.canonical_bytes()?;
        self.public_key.verify(&message, &self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some_hash() -> ContentHash {
        ContentHash::from_bytes([0xa3; 32])
    }

    #[test]
    fn test_signed_tx_verifies() {
        let keypair = Keypair::from_seed(&[5; 32]);
        let tx = SignedTx::register(some_hash(), &keypair).unwrap();
        tx.verify().unwrap();
        assert_eq!(tx.body.sender, keypair.address());
    }

    #[test]
    fn test_tx_hash_is_deterministic() {
        let keypair = Keypair::from_seed(&[5; 32]);
        let a = SignedTx::register(some_hash(), &keypair).unwrap();
        let b = SignedTx::register(some_hash(), &keypair).unwrap();
        assert_eq!(a.tx_hash().unwrap(), b.tx_hash().unwrap());
    }

    #[test]
    fn test_mismatched_sender_rejected() {
        let keypair = Keypair::from_seed(&[5; 32]);
        let other = Keypair::from_seed(&[6; 32]);
        let mut tx = SignedTx::register(some_hash(), &keypair).unwrap();
        tx.body.sender = other.address();
        assert!(tx.verify().is_err());
    }

    #[test]
    fn test_tampered_body_rejected() {
        let keypair = Keypair::from_seed(&[5; 32]);
        let mut tx = SignedTx::register(some_hash(), &keypair).unwrap();
        tx.body.hash = ContentHash::from_bytes([0xff; 32]);
        assert!(tx.verify().is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_any_hash_signs_and_verifies(
                bytes in any::<[u8; 32]>(),
                seed in any::<[u8; 32]>(),
            ) {
                let keypair = Keypair::from_seed(&seed);
                let tx = SignedTx::register(ContentHash::from_bytes(bytes), &keypair).unwrap();
                prop_assert!(tx.verify().is_ok());
            }
        }
    }
}
