//! On-chain proof and receipt types.
//!
//! A [`LedgerProof`] is the ledger's read-only existence record for a
//! hash: once its owner is non-zero it never changes again. A
//! [`LedgerReceipt`] is what a successful registration submission returns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte registrant address.
///
/// The all-zero address is the ledger's sentinel for "this hash was never
/// registered". Serializes as the `0x`-prefixed hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerAddress(pub [u8; 20]);

impl Serialize for OwnerAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for OwnerAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        OwnerAddress::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl OwnerAddress {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 20 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// True when this is the never-registered sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// The zero address (never-registered sentinel).
    pub const ZERO: Self = Self([0u8; 20]);
}

impl fmt::Debug for OwnerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerAddress({})", &hex::encode(self.0)[..16])
    }
}

impl fmt::Display for OwnerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for OwnerAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A 32-byte transaction hash. Serializes as the `0x`-prefixed hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHash(pub [u8; 32]);

impl TxHash {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl Serialize for TxHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TxHash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", &hex::encode(self.0)[..16])
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for TxHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for TxHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// The ledger's existence/ownership record for a hash.
///
/// Read-only to this system. Append-only semantics: once `owner` is
/// non-zero it never reverts to zero, and neither field ever changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerProof {
    /// Address that performed the registration; zero means never registered.
    pub owner: OwnerAddress,
    /// Time of on-chain registration (Unix ms). Zero when absent.
    pub block_timestamp: i64,
}

impl LedgerProof {
    /// The proof returned for a hash that was never registered.
    pub const fn absent() -> Self {
        Self {
            owner: OwnerAddress::ZERO,
            block_timestamp: 0,
        }
    }

    /// True when the hash has no on-chain registration.
    pub fn is_absent(&self) -> bool {
        self.owner.is_zero()
    }
}

/// Receipt for a registration transaction that reached inclusion.
///
/// The receipt confirms inclusion only; authoritative owner and timestamp
/// come from reading the proof back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    /// Hash of the included transaction.
    pub tx_hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_address_sentinel() {
        assert!(OwnerAddress::ZERO.is_zero());
        assert!(!OwnerAddress::from_bytes([1; 20]).is_zero());
    }

    #[test]
    fn test_owner_address_hex_roundtrip() {
        let addr = OwnerAddress::from_bytes([0x42; 20]);
        let recovered = OwnerAddress::from_hex(&addr.to_hex()).unwrap();
        assert_eq!(addr, recovered);

        // Unprefixed input is accepted too.
        let recovered = OwnerAddress::from_hex(&hex::encode([0x42; 20])).unwrap();
        assert_eq!(addr, recovered);
    }

    #[test]
    fn test_owner_address_bad_length() {
        assert!(OwnerAddress::from_hex("0xabcd").is_err());
    }

    #[test]
    fn test_absent_proof() {
        let proof = LedgerProof::absent();
        assert!(proof.is_absent());
        assert_eq!(proof.block_timestamp, 0);

        let present = LedgerProof {
            owner: OwnerAddress::from_bytes([7; 20]),
            block_timestamp: 1_700_000_000_000,
        };
        assert!(!present.is_absent());
    }
}
