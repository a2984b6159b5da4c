//! Content hash canonicalization.
//!
//! A raw hash arrives as a 64-character hex string (a 32-byte digest, no
//! prefix). The ledger wants it in a prefixed fixed-width form. This
//! module is the single definition of both.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HashFormatError;

/// A canonical 32-byte content digest.
///
/// The ledger-facing form is the `0x`-prefixed lowercase hex string; see
/// [`ContentHash::to_prefixed`]. The raw (unprefixed) input string remains
/// the metadata store's key convention. Serializes as the prefixed form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(pub [u8; 32]);

impl Serialize for ContentHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_prefixed())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let raw = s.strip_prefix("0x").unwrap_or(&s);
        canonicalize(raw).map_err(serde::de::Error::custom)
    }
}

impl ContentHash {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Unprefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The ledger's required fixed-width form: `0x` + 64 lowercase hex.
    pub fn to_prefixed(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse a raw hash string. Alias for [`canonicalize`].
    pub fn parse(raw: &str) -> Result<Self, HashFormatError> {
        canonicalize(raw)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_prefixed())
    }
}

impl AsRef<[u8]> for ContentHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for ContentHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Validate and normalize a raw hash string into its canonical form.
///
/// The input must be exactly 64 hexadecimal characters, no prefix. Both
/// hex cases are accepted; the canonical form is case-insensitive since
/// it is held as bytes. Pure and deterministic.
pub fn canonicalize(raw: &str) -> Result<ContentHash, HashFormatError> {
    if raw.len() != 64 {
        return Err(HashFormatError::InvalidLength(raw.len()));
    }

    // Reject non-ASCII-hex before decoding so the error names the offender.
    if let Some((position, found)) = raw
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(HashFormatError::InvalidCharacter { position, found });
    }

    let bytes = hex::decode(raw).map_err(|_| HashFormatError::InvalidLength(raw.len()))?;
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(ContentHash(arr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_canonicalize_valid() {
        let raw = "a3".repeat(32);
        let hash = canonicalize(&raw).unwrap();
        assert_eq!(hash.to_hex(), raw);
        assert_eq!(hash.to_prefixed(), format!("0x{}", raw));
    }

    #[test]
    fn test_canonicalize_uppercase() {
        let lower = "ab".repeat(32);
        let upper = lower.to_uppercase();
        assert_eq!(canonicalize(&lower).unwrap(), canonicalize(&upper).unwrap());
    }

    #[test]
    fn test_canonicalize_wrong_length() {
        assert_eq!(
            canonicalize("abc123"),
            Err(HashFormatError::InvalidLength(6))
        );
        assert_eq!(canonicalize(""), Err(HashFormatError::InvalidLength(0)));
        let too_long = "a".repeat(65);
        assert_eq!(
            canonicalize(&too_long),
            Err(HashFormatError::InvalidLength(65))
        );
    }

    #[test]
    fn test_canonicalize_rejects_prefix() {
        // A prefixed digest is 66 characters, so it fails on length alone.
        let prefixed = format!("0x{}", "ab".repeat(32));
        assert_eq!(
            canonicalize(&prefixed),
            Err(HashFormatError::InvalidLength(66))
        );
    }

    #[test]
    fn test_canonicalize_non_hex() {
        let mut raw = "a".repeat(64);
        raw.replace_range(10..11, "g");
        assert_eq!(
            canonicalize(&raw),
            Err(HashFormatError::InvalidCharacter {
                position: 10,
                found: 'g'
            })
        );
    }

    #[test]
    fn test_serde_uses_prefixed_form() {
        let hash = ContentHash::from_bytes([0xa3; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "a3".repeat(32)));

        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);

        // The unprefixed form deserializes too.
        let raw = format!("\"{}\"", "a3".repeat(32));
        let back: ContentHash = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, hash);
    }

    #[test]
    fn test_display_is_prefixed() {
        let hash = ContentHash::from_bytes([0xcd; 32]);
        let display = format!("{}", hash);
        assert!(display.starts_with("0x"));
        assert_eq!(display.len(), 66);
    }

    proptest! {
        #[test]
        fn prop_valid_hex_always_canonicalizes(bytes in any::<[u8; 32]>()) {
            let raw = hex::encode(bytes);
            let hash = canonicalize(&raw).unwrap();
            prop_assert_eq!(hash.as_bytes(), &bytes);
            // Deterministic: same input, same output.
            prop_assert_eq!(canonicalize(&raw).unwrap(), hash);
        }

        #[test]
        fn prop_wrong_length_always_fails(s in "[0-9a-f]{0,63}|[0-9a-f]{65,80}") {
            prop_assert!(canonicalize(&s).is_err());
        }
    }
}
