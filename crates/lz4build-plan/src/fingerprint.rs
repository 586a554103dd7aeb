//! Content fingerprints for artifact descriptors.
//!
//! A fingerprint is the SHA-256 of a value's JSON encoding. Identical
//! descriptors always fingerprint identically, so fingerprints name build
//! directories and manifests.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Compute the hex SHA-256 fingerprint of any serializable value.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    let digest = Sha256::digest(&json);
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(
            fingerprint(&"liblz4").unwrap(),
            fingerprint(&"liblz4").unwrap()
        );
    }

    #[test]
    fn distinct_inputs_differ() {
        assert_ne!(fingerprint(&1u8).unwrap(), fingerprint(&2u8).unwrap());
    }

    #[test]
    fn hex_length() {
        assert_eq!(fingerprint(&42u32).unwrap().len(), 64);
    }
}
