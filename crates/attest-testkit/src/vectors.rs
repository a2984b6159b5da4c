//! Canonicalization vectors.
//!
//! Any implementation that canonicalizes hashes for this registry must
//! map these inputs to exactly these outputs.

use serde::{Deserialize, Serialize};

use attest_core::canonicalize;

/// A single canonicalization vector.
#[derive(Debug, Serialize, Deserialize)]
pub struct CanonicalVector {
    pub name: String,
    /// The raw input string.
    pub input: String,
    /// The expected prefixed form, or None when the input must be rejected.
    pub canonical: Option<String>,
}

fn vector(name: &str, input: impl Into<String>, canonical: Option<&str>) -> CanonicalVector {
    CanonicalVector {
        name: name.to_string(),
        input: input.into(),
        canonical: canonical.map(String::from),
    }
}

/// All canonicalization vectors.
pub fn all_vectors() -> Vec<CanonicalVector> {
    let all_zero = "0".repeat(64);
    let all_f = "f".repeat(64);
    // SHA-256 of the empty string, the best-known 64-hex constant.
    let empty_sha = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    vec![
        vector("all_zero", all_zero.clone(), Some(&format!("0x{}", all_zero))),
        vector("all_f", all_f.clone(), Some(&format!("0x{}", all_f))),
        vector("sha256_empty", empty_sha, Some(&format!("0x{}", empty_sha))),
        vector(
            "uppercase_folds",
            empty_sha.to_uppercase(),
            Some(&format!("0x{}", empty_sha)),
        ),
        vector("empty_rejected", "", None),
        vector("short_rejected", "abc123", None),
        vector("long_rejected", "a".repeat(65), None),
        vector("prefixed_rejected", format!("0x{}", all_zero), None),
        vector("non_hex_rejected", "z".repeat(64), None),
    ]
}

/// Check a vector against this implementation.
pub fn check_vector(v: &CanonicalVector) -> bool {
    match (&v.canonical, canonicalize(&v.input)) {
        (Some(expected), Ok(hash)) => hash.to_prefixed() == *expected,
        (None, Err(_)) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_pass() {
        for v in all_vectors() {
            assert!(check_vector(&v), "vector {} failed", v.name);
        }
    }

    #[test]
    fn test_vectors_roundtrip_as_json() {
        let vectors = all_vectors();
        let json = serde_json::to_string_pretty(&vectors).unwrap();
        let back: Vec<CanonicalVector> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), vectors.len());
    }
}
