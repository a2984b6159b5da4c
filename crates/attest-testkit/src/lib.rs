//! # Attest Testkit
//!
//! Testing utilities for the attest workspace:
//!
//! - [`fixtures`] - Ready-wired notaries over in-memory backends
//! - [`generators`] - Proptest strategies for hashes and metadata
//! - [`vectors`] - Canonicalization vectors shared across implementations

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{shared_ledger_fixtures, TestFixture};
pub use vectors::{all_vectors, CanonicalVector};
