//! SQLite implementation of the MetadataStore trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use attest_core::{DocumentRecord, OwnerAddress, TxHash};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{MetadataStore, UpsertResult};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn lock_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
        Some(format!("mutex poisoned: {}", e)),
    ))
}

fn join_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
        Some(format!("spawn_blocking failed: {}", e)),
    ))
}

// Helper to convert a row to DocumentRecord
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRecord> {
    let tx_hash_bytes: Option<Vec<u8>> = row.get("tx_hash")?;
    let owner_bytes: Option<Vec<u8>> = row.get("owner_address")?;
    let block_number: Option<i64> = row.get("block_number")?;

    let tx_hash = tx_hash_bytes
        .map(|b| {
            b.try_into().map(TxHash::from_bytes).map_err(|_| {
                rusqlite::Error::InvalidColumnType(5, "tx_hash".into(), rusqlite::types::Type::Blob)
            })
        })
        .transpose()?;

    let owner_address = owner_bytes
        .map(|b| {
            b.try_into().map(OwnerAddress::from_bytes).map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    7,
                    "owner_address".into(),
                    rusqlite::types::Type::Blob,
                )
            })
        })
        .transpose()?;

    Ok(DocumentRecord {
        doc_hash: row.get("doc_hash")?,
        filename: row.get("filename")?,
        file_size: row.get::<_, i64>("file_size")? as u64,
        mime_type: row.get("mime_type")?,
        uploader: row.get("uploader")?,
        tx_hash,
        block_number: block_number.map(|n| n as u64),
        owner_address,
        ledger_timestamp: row.get("ledger_timestamp")?,
        is_registered: row.get::<_, i64>("is_registered")? != 0,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

const SELECT_COLUMNS: &str = "doc_hash, filename, file_size, mime_type, uploader, tx_hash, \
     block_number, owner_address, ledger_timestamp, is_registered, created_at, updated_at";

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn find_by_hash(&self, doc_hash: &str) -> Result<Option<DocumentRecord>> {
        let doc_hash = doc_hash.to_string();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(lock_err)?;

            conn.query_row(
                &format!("SELECT {} FROM documents WHERE doc_hash = ?1", SELECT_COLUMNS),
                params![doc_hash],
                row_to_record,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
        .map_err(join_err)?
    }

    async fn upsert(&self, record: &DocumentRecord) -> Result<UpsertResult> {
        record
            .validate()
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;

        let record = record.clone();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(lock_err)?;

            let existed: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM documents WHERE doc_hash = ?1)",
                params![record.doc_hash],
                |row| row.get(0),
            )?;

            // The hash primary key makes this atomic; a concurrent writer
            // lands on the update path rather than a duplicate row.
            conn.execute(
                "INSERT INTO documents (
                    doc_hash, filename, file_size, mime_type, uploader,
                    tx_hash, block_number, owner_address, ledger_timestamp,
                    is_registered, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                ON CONFLICT(doc_hash) DO UPDATE SET
                    filename = excluded.filename,
                    file_size = excluded.file_size,
                    mime_type = excluded.mime_type,
                    uploader = excluded.uploader,
                    tx_hash = excluded.tx_hash,
                    block_number = excluded.block_number,
                    owner_address = excluded.owner_address,
                    ledger_timestamp = excluded.ledger_timestamp,
                    is_registered = excluded.is_registered,
                    updated_at = excluded.updated_at",
                params![
                    record.doc_hash,
                    record.filename,
                    record.file_size as i64,
                    record.mime_type,
                    record.uploader,
                    record.tx_hash.as_ref().map(|h| h.0.as_slice()),
                    record.block_number.map(|n| n as i64),
                    record.owner_address.as_ref().map(|a| a.0.as_slice()),
                    record.ledger_timestamp,
                    record.is_registered as i64,
                    record.created_at,
                    record.updated_at,
                ],
            )?;

            Ok(if existed {
                UpsertResult::Updated
            } else {
                UpsertResult::Created
            })
        })
        .await
        .map_err(join_err)?
    }

    async fn capture_meta(&self, record: &DocumentRecord) -> Result<UpsertResult> {
        record
            .validate()
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;

        let record = record.clone();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(lock_err)?;

            let existed: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM documents WHERE doc_hash = ?1)",
                params![record.doc_hash],
                |row| row.get(0),
            )?;

            // The update path only refreshes descriptive fields: ledger
            // state confirmed by a concurrent flow stays intact.
            conn.execute(
                "INSERT INTO documents (
                    doc_hash, filename, file_size, mime_type, uploader,
                    tx_hash, block_number, owner_address, ledger_timestamp,
                    is_registered, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                ON CONFLICT(doc_hash) DO UPDATE SET
                    filename = excluded.filename,
                    file_size = excluded.file_size,
                    mime_type = excluded.mime_type,
                    uploader = excluded.uploader,
                    updated_at = excluded.updated_at",
                params![
                    record.doc_hash,
                    record.filename,
                    record.file_size as i64,
                    record.mime_type,
                    record.uploader,
                    record.tx_hash.as_ref().map(|h| h.0.as_slice()),
                    record.block_number.map(|n| n as i64),
                    record.owner_address.as_ref().map(|a| a.0.as_slice()),
                    record.ledger_timestamp,
                    record.is_registered as i64,
                    record.created_at,
                    record.updated_at,
                ],
            )?;

            Ok(if existed {
                UpsertResult::Updated
            } else {
                UpsertResult::Created
            })
        })
        .await
        .map_err(join_err)?
    }

    async fn list_pending(&self) -> Result<Vec<DocumentRecord>> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(lock_err)?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM documents WHERE is_registered = 0 ORDER BY created_at",
                SELECT_COLUMNS
            ))?;

            let records = stmt
                .query_map([], row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(records)
        })
        .await
        .map_err(join_err)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_core::DocumentMeta;

    fn meta(name: &str) -> DocumentMeta {
        DocumentMeta {
            filename: name.to_string(),
            file_size: 1024,
            mime_type: Some("application/pdf".into()),
            uploader: Some("alice@example.com".into()),
        }
    }

    fn raw_hash(byte: u8) -> String {
        hex::encode([byte; 32])
    }

    #[tokio::test]
    async fn test_find_absent_is_none() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.find_by_hash(&raw_hash(0x01)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_create_then_update() {
        let store = SqliteStore::open_memory().unwrap();
        let hash = raw_hash(0x02);

        let pending = DocumentRecord::pending(&hash, meta("a.pdf"), 1000);
        assert_eq!(store.upsert(&pending).await.unwrap(), UpsertResult::Created);

        let registered = pending.clone().into_registered(
            TxHash::from_bytes([9; 32]),
            3,
            OwnerAddress::from_bytes([4; 20]),
            1_700_000_000_000,
            2000,
        );
        assert_eq!(
            store.upsert(&registered).await.unwrap(),
            UpsertResult::Updated
        );

        let found = store.find_by_hash(&hash).await.unwrap().unwrap();
        assert!(found.is_registered);
        assert_eq!(found.block_number, Some(3));
        assert_eq!(found.owner_address, Some(OwnerAddress::from_bytes([4; 20])));
        // Creation time survives the update path.
        assert_eq!(found.created_at, 1000);
        assert_eq!(found.updated_at, 2000);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let store = SqliteStore::open_memory().unwrap();
        let hash = raw_hash(0x03);
        let record = DocumentRecord::pending(&hash, meta("b.pdf"), 1000);

        store.upsert(&record).await.unwrap();
        store.upsert(&record).await.unwrap();

        let found = store.find_by_hash(&hash).await.unwrap().unwrap();
        assert_eq!(found, record);
    }

    #[tokio::test]
    async fn test_upsert_rejects_invariant_violation() {
        let store = SqliteStore::open_memory().unwrap();
        let mut record = DocumentRecord::pending(&raw_hash(0x04), meta("c.pdf"), 1000);
        record.is_registered = true; // no ledger fields

        let err = store.upsert(&record).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
        assert!(store.find_by_hash(&raw_hash(0x04)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_capture_meta_never_downgrades_registration() {
        let store = SqliteStore::open_memory().unwrap();
        let hash = raw_hash(0x08);

        let registered = DocumentRecord::pending(&hash, meta("winner.pdf"), 1000).into_registered(
            TxHash::from_bytes([9; 32]),
            5,
            OwnerAddress::from_bytes([4; 20]),
            1_700_000_000_000,
            1500,
        );
        store.upsert(&registered).await.unwrap();

        // A late metadata capture from a racing request.
        let late = DocumentRecord::pending(&hash, meta("loser.pdf"), 1600);
        assert_eq!(
            store.capture_meta(&late).await.unwrap(),
            UpsertResult::Updated
        );

        let found = store.find_by_hash(&hash).await.unwrap().unwrap();
        assert!(found.is_registered);
        assert_eq!(found.block_number, Some(5));
        // Descriptive fields did move.
        assert_eq!(found.filename, "loser.pdf");
    }

    #[tokio::test]
    async fn test_capture_meta_creates_pending_record() {
        let store = SqliteStore::open_memory().unwrap();
        let hash = raw_hash(0x09);

        let pending = DocumentRecord::pending(&hash, meta("new.pdf"), 1000);
        assert_eq!(
            store.capture_meta(&pending).await.unwrap(),
            UpsertResult::Created
        );

        let found = store.find_by_hash(&hash).await.unwrap().unwrap();
        assert!(!found.is_registered);
        assert_eq!(found.filename, "new.pdf");
    }

    #[tokio::test]
    async fn test_list_pending() {
        let store = SqliteStore::open_memory().unwrap();

        let pending = DocumentRecord::pending(&raw_hash(0x05), meta("p.pdf"), 1000);
        let registered = DocumentRecord::pending(&raw_hash(0x06), meta("r.pdf"), 1100)
            .into_registered(
                TxHash::from_bytes([1; 32]),
                1,
                OwnerAddress::from_bytes([2; 20]),
                1_700_000_000_000,
                1200,
            );

        store.upsert(&pending).await.unwrap();
        store.upsert(&registered).await.unwrap();

        let pendings = store.list_pending().await.unwrap();
        assert_eq!(pendings.len(), 1);
        assert_eq!(pendings[0].doc_hash, raw_hash(0x05));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attest.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            let record = DocumentRecord::pending(&raw_hash(0x07), meta("d.pdf"), 1000);
            store.upsert(&record).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert!(store.find_by_hash(&raw_hash(0x07)).await.unwrap().is_some());
    }
}
