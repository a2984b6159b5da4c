//! # Attest
//!
//! Document-hash registration and cross-ledger verification: an
//! append-only on-chain registry holds the proof that a hash exists, a
//! mutable off-chain store holds its descriptive metadata, and the
//! [`Notary`] reconciles the two into a single trust status.
//!
//! ## Key Concepts
//!
//! - **Proof**: the ledger's read-only ownership record for a hash.
//!   Immutable once written; the zero owner means "never registered".
//! - **Record**: the off-chain metadata for a hash. Mutable, advisory,
//!   never proof of registration on its own.
//! - **Two-phase registration**: ledger write, proof read-back, then
//!   metadata upsert. The gap between phases is a first-class pending
//!   state, recoverable via [`Notary::pending_registrations`].
//! - **Ledger as arbiter**: concurrent registrations of the same hash
//!   are serialized by the registry, not by this crate; the loser sees a
//!   rejection and is told to re-verify.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use attest::{Notary, NotaryConfig};
//! use attest::core::DocumentMeta;
//! use attest::ledger::{InMemoryRegistry, Keypair, LedgerClient};
//! use attest::store::SqliteStore;
//!
//! async fn example() {
//!     let registry = Arc::new(InMemoryRegistry::new());
//!     let client = LedgerClient::new(registry, Keypair::generate());
//!     let store = SqliteStore::open("attest.db").unwrap();
//!
//!     let notary = Notary::new(store, client, NotaryConfig::default());
//!
//!     let meta = DocumentMeta {
//!         filename: "report.pdf".into(),
//!         file_size: 4096,
//!         mime_type: Some("application/pdf".into()),
//!         uploader: Some("alice@example.com".into()),
//!     };
//!
//!     let raw_hash = "a3".repeat(32);
//!     let registration = notary.register(&raw_hash, meta).await.unwrap();
//!     assert!(registration.record.is_registered);
//!
//!     let verification = notary.verify(&raw_hash).await.unwrap();
//!     // verification.status == VerificationStatus::VerifiedOk
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `attest::core` - Hashes, proofs, records, status derivation
//! - `attest::ledger` - Ledger client, registry capability, signer
//! - `attest::store` - Metadata store abstraction and SQLite

pub mod error;
pub mod notary;

// Re-export component crates
pub use attest_core as core;
pub use attest_ledger as ledger;
pub use attest_store as store;

// Re-export main types for convenience
pub use error::{NotaryError, Phase, Result};
pub use notary::{Notary, NotaryConfig, Registration, Verification};

// Re-export commonly used core types
pub use attest_core::{
    canonicalize, ContentHash, DocumentMeta, DocumentRecord, LedgerProof, LedgerReceipt,
    OwnerAddress, TxHash, VerificationStatus,
};
