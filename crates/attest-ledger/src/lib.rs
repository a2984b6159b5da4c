//! # Attest Ledger
//!
//! The on-chain side of attest: registration transactions, the
//! [`Registry`] capability boundary, and the [`LedgerClient`] that drives
//! fee estimation, submission, and proof reads.
//!
//! ## Overview
//!
//! The external registry exposes exactly two operations: register a hash
//! once, and read back the proof for a hash. This crate wraps that
//! capability behind the [`Registry`] trait so the rest of the system
//! never talks to a node directly and never parses node error text. The
//! primary test/embedding implementation is [`InMemoryRegistry`], which
//! preserves the ledger's atomic first-writer-wins semantics.
//!
//! ## Key Types
//!
//! - [`Keypair`] - The signing identity, injected at construction
//! - [`SignedTx`] - A canonically encoded, signed registration transaction
//! - [`Registry`] - The async capability trait for the on-chain registry
//! - [`LedgerClient`] - Estimate, submit, and read back for one signer
//! - [`LedgerError`] - Structured rejection vs. unavailability

pub mod client;
pub mod error;
pub mod registry;
pub mod signer;
pub mod tx;

pub use client::LedgerClient;
pub use error::{LedgerError, Result};
pub use registry::{memory::InMemoryRegistry, FeeEstimate, Registry};
pub use signer::{Ed25519PublicKey, Ed25519Signature, Keypair};
pub use tx::{RegistrationTx, SignedTx};
