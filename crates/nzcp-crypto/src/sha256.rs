//! # SHA-256 — Message Digest
//!
//! Thin wrapper over the `sha2` crate. The to-be-signed buffer is hashed
//! with SHA-256 before ECDSA verification; [`message_hash`] returns the
//! digest in the big-endian integer form the verifier consumes.

use sha2::{Digest, Sha256};

use crate::u256::U256;

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// SHA-256 of `data`, interpreted as a big-endian 256-bit integer.
pub fn message_hash(data: &[u8]) -> U256 {
    U256::from_be_bytes(&sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_abc() {
        let digest = sha256(b"abc");
        assert_eq!(
            U256::from_be_bytes(&digest).to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_empty() {
        let digest = sha256(b"");
        assert_eq!(
            U256::from_be_bytes(&digest).to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_message_hash_matches_digest() {
        let data = b"to-be-signed";
        assert_eq!(message_hash(data), U256::from_be_bytes(&sha256(data)));
    }
}
