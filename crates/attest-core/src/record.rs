//! Off-chain document records.
//!
//! A [`DocumentRecord`] is the mutable metadata side of a registration,
//! keyed by the raw hash string the caller supplied. The ledger fields
//! stay empty until a ledger write has been confirmed and read back.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::proof::{OwnerAddress, TxHash};

/// Caller-supplied descriptive fields. Unvalidated beyond presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub filename: String,
    pub file_size: u64,
    pub mime_type: Option<String>,
    /// Email or wallet address of whoever uploaded the document.
    pub uploader: Option<String>,
}

/// One metadata record per registered hash.
///
/// `is_registered` is true only once a ledger write has succeeded and been
/// reflected back, in which case all four ledger fields are populated. A
/// record with `is_registered = false` is a valid intermediate state:
/// metadata captured, ledger write not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// The raw hash string as supplied by the caller. Store key.
    pub doc_hash: String,
    pub filename: String,
    pub file_size: u64,
    pub mime_type: Option<String>,
    pub uploader: Option<String>,

    // Ledger receipt fields, absent until a confirmed ledger write.
    pub tx_hash: Option<TxHash>,
    pub block_number: Option<u64>,
    pub owner_address: Option<OwnerAddress>,
    /// Block timestamp from the ledger proof (Unix ms).
    pub ledger_timestamp: Option<i64>,

    pub is_registered: bool,

    /// When the record was first created (Unix ms).
    pub created_at: i64,
    /// When the record was last written (Unix ms).
    pub updated_at: i64,
}

impl DocumentRecord {
    /// A record whose ledger write has not been confirmed yet.
    pub fn pending(doc_hash: impl Into<String>, meta: DocumentMeta, now: i64) -> Self {
        Self {
            doc_hash: doc_hash.into(),
            filename: meta.filename,
            file_size: meta.file_size,
            mime_type: meta.mime_type,
            uploader: meta.uploader,
            tx_hash: None,
            block_number: None,
            owner_address: None,
            ledger_timestamp: None,
            is_registered: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark this record registered with the given receipt and proof fields.
    pub fn into_registered(
        mut self,
        tx_hash: TxHash,
        block_number: u64,
        owner: OwnerAddress,
        ledger_timestamp: i64,
        now: i64,
    ) -> Self {
        self.tx_hash = Some(tx_hash);
        self.block_number = Some(block_number);
        self.owner_address = Some(owner);
        self.ledger_timestamp = Some(ledger_timestamp);
        self.is_registered = true;
        self.updated_at = now;
        self
    }

    /// Check the registered-record invariant.
    ///
    /// A record flagged registered must carry every ledger field.
    pub fn validate(&self) -> Result<(), RecordError> {
        if !self.is_registered {
            return Ok(());
        }
        let missing = if self.tx_hash.is_none() {
            Some("tx_hash")
        } else if self.block_number.is_none() {
            Some("block_number")
        } else if self.owner_address.is_none() {
            Some("owner_address")
        } else if self.ledger_timestamp.is_none() {
            Some("ledger_timestamp")
        } else {
            None
        };

        match missing {
            Some(field) => Err(RecordError::MissingLedgerField {
                hash: self.doc_hash.clone(),
                field,
            }),
            None => Ok(()),
        }
    }

    /// Descriptive fields of this record.
    pub fn meta(&self) -> DocumentMeta {
        DocumentMeta {
            filename: self.filename.clone(),
            file_size: self.file_size,
            mime_type: self.mime_type.clone(),
            uploader: self.uploader.clone(),
        }
    }
}
