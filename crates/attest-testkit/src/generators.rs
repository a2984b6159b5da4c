//! Proptest generators for property-based testing.

use proptest::prelude::*;

use attest_core::{ContentHash, DocumentMeta, OwnerAddress, TxHash};

/// Generate a valid raw hash: 64 lowercase hex characters.
pub fn raw_hash() -> impl Strategy<Value = String> {
    any::<[u8; 32]>().prop_map(hex::encode)
}

/// Generate a valid raw hash with mixed case.
pub fn mixed_case_raw_hash() -> impl Strategy<Value = String> {
    "[0-9a-fA-F]{64}"
}

/// Generate strings that must fail canonicalization.
pub fn invalid_raw_hash() -> impl Strategy<Value = String> {
    prop_oneof![
        // Wrong length, right alphabet.
        "[0-9a-f]{0,63}",
        "[0-9a-f]{65,100}",
        // Right length, wrong alphabet.
        "[g-z]{64}",
        // Prefixed digests are 66 characters and must be rejected.
        "[0-9a-f]{64}".prop_map(|s| format!("0x{}", s)),
    ]
}

/// Generate a random ContentHash.
pub fn content_hash() -> impl Strategy<Value = ContentHash> {
    any::<[u8; 32]>().prop_map(ContentHash::from_bytes)
}

/// Generate a random non-zero OwnerAddress.
pub fn owner_address() -> impl Strategy<Value = OwnerAddress> {
    any::<[u8; 20]>()
        .prop_filter("zero address is the absence sentinel", |b| b != &[0u8; 20])
        .prop_map(OwnerAddress::from_bytes)
}

/// Generate a random TxHash.
pub fn tx_hash() -> impl Strategy<Value = TxHash> {
    any::<[u8; 32]>().prop_map(TxHash::from_bytes)
}

/// Generate descriptive document metadata.
pub fn document_meta() -> impl Strategy<Value = DocumentMeta> {
    (
        "[a-z0-9_-]{1,32}\\.(pdf|txt|png)",
        0u64..=100_000_000,
        prop::option::of(Just("application/octet-stream".to_string())),
        prop::option::of("[a-z]{3,12}@example\\.com"),
    )
        .prop_map(|(filename, file_size, mime_type, uploader)| DocumentMeta {
            filename,
            file_size,
            mime_type,
            uploader,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_core::canonicalize;

    proptest! {
        #[test]
        fn prop_generated_hashes_canonicalize(raw in raw_hash()) {
            canonicalize(&raw).unwrap();
        }

        #[test]
        fn prop_mixed_case_canonicalizes_consistently(raw in mixed_case_raw_hash()) {
            let hash = canonicalize(&raw).unwrap();
            prop_assert_eq!(hash, canonicalize(&raw.to_lowercase()).unwrap());
        }

        #[test]
        fn prop_invalid_hashes_fail(raw in invalid_raw_hash()) {
            prop_assert!(canonicalize(&raw).is_err());
        }
    }
}
