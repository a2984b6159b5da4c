//! In-memory implementation of the MetadataStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use attest_core::DocumentRecord;

use crate::error::{Result, StoreError};
use crate::traits::{MetadataStore, UpsertResult};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    records: RwLock<HashMap<String, DocumentRecord>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn find_by_hash(&self, doc_hash: &str) -> Result<Option<DocumentRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(doc_hash).cloned())
    }

    async fn upsert(&self, record: &DocumentRecord) -> Result<UpsertResult> {
        record
            .validate()
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;

        let mut records = self.records.write().unwrap();
        match records.get(&record.doc_hash) {
            Some(existing) => {
                let mut replacement = record.clone();
                // Same semantics as SQLite: the update path keeps the
                // original creation time.
                replacement.created_at = existing.created_at;
                records.insert(record.doc_hash.clone(), replacement);
                Ok(UpsertResult::Updated)
            }
            None => {
                records.insert(record.doc_hash.clone(), record.clone());
                Ok(UpsertResult::Created)
            }
        }
    }

    async fn capture_meta(&self, record: &DocumentRecord) -> Result<UpsertResult> {
        record
            .validate()
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;

        let mut records = self.records.write().unwrap();
        match records.get_mut(&record.doc_hash) {
            Some(existing) => {
                // Only the descriptive fields move; registration state
                // confirmed by a concurrent flow stays intact.
                existing.filename = record.filename.clone();
                existing.file_size = record.file_size;
                existing.mime_type = record.mime_type.clone();
                existing.uploader = record.uploader.clone();
                existing.updated_at = record.updated_at;
                Ok(UpsertResult::Updated)
            }
            None => {
                records.insert(record.doc_hash.clone(), record.clone());
                Ok(UpsertResult::Created)
            }
        }
    }

    async fn list_pending(&self) -> Result<Vec<DocumentRecord>> {
        let records = self.records.read().unwrap();
        let mut pending: Vec<DocumentRecord> = records
            .values()
            .filter(|r| !r.is_registered)
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.created_at);
        Ok(pending)
    }
}
