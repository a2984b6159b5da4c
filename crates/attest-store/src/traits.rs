//! Store trait: the abstract interface for document record persistence.
//!
//! This trait keeps the orchestrator storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;

use attest_core::DocumentRecord;

use crate::error::Result;

/// Result of upserting a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertResult {
    /// No record existed for the hash; one was created.
    Created,
    /// An existing record was replaced.
    Updated,
}

/// The MetadataStore trait: async interface for document records.
///
/// All methods are async to support both sync (SQLite) and async
/// backends. For SQLite, `spawn_blocking` is used internally to avoid
/// blocking the runtime.
///
/// # Design Notes
///
/// - **Idempotent upsert**: keyed on the record's `doc_hash`; retrying
///   with the same field set converges to the same stored state. The
///   hash's uniqueness at the store is the only mutual exclusion.
/// - **Registered-record invariant**: implementations refuse a record
///   flagged registered that is missing any ledger field.
/// - **created_at is sticky**: the update path preserves the original
///   creation time and only advances `updated_at`.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Look up a record by the raw hash string. Absence is `None`.
    async fn find_by_hash(&self, doc_hash: &str) -> Result<Option<DocumentRecord>>;

    /// Create or replace the record for its hash.
    async fn upsert(&self, record: &DocumentRecord) -> Result<UpsertResult>;

    /// Create the record if absent, or refresh its descriptive fields.
    ///
    /// Never touches ledger fields or the registration flag, so a
    /// concurrent flow that already confirmed its registration cannot be
    /// downgraded by a later metadata capture.
    async fn capture_meta(&self, record: &DocumentRecord) -> Result<UpsertResult>;

    /// Enumerate records whose ledger write has not been confirmed.
    ///
    /// These are the recoverable intermediate state between metadata
    /// capture and a confirmed on-chain registration.
    async fn list_pending(&self) -> Result<Vec<DocumentRecord>>;
}

// A shared handle to a store is a store; callers that clone an Arc across
// concurrent flows keep the same semantics.
#[async_trait]
impl<S: MetadataStore + ?Sized> MetadataStore for std::sync::Arc<S> {
    async fn find_by_hash(&self, doc_hash: &str) -> Result<Option<DocumentRecord>> {
        (**self).find_by_hash(doc_hash).await
    }

    async fn upsert(&self, record: &DocumentRecord) -> Result<UpsertResult> {
        (**self).upsert(record).await
    }

    async fn capture_meta(&self, record: &DocumentRecord) -> Result<UpsertResult> {
        (**self).capture_meta(record).await
    }

    async fn list_pending(&self) -> Result<Vec<DocumentRecord>> {
        (**self).list_pending().await
    }
}
