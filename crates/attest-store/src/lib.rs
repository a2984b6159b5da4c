//! # Attest Store
//!
//! Off-chain metadata persistence for attest. Provides a trait-based
//! interface for document records with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store holds one [`DocumentRecord`] per hash, keyed by the raw hash
//! string the caller supplied. The hash primary key is the store's only
//! mutual-exclusion mechanism: the upsert is idempotent, so no
//! application-level locking exists.
//!
//! ## Key Types
//!
//! - [`MetadataStore`] - The async trait for all record operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`UpsertResult`] - Whether an upsert created or replaced a record
//!
//! ## Design Notes
//!
//! - **Non-failing lookups**: `find_by_hash` returns `None` on absence
//! - **Idempotent upsert**: safe to retry with the same final field set
//! - **Pending records**: records with `is_registered = false` are a
//!   valid intermediate state and can be enumerated for recovery
//!
//! [`DocumentRecord`]: attest_core::DocumentRecord

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{MetadataStore, UpsertResult};
