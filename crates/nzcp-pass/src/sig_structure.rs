//! # Sig_structure — the To-Be-Signed Buffer
//!
//! What a COSE_Sign1 signature covers is not the envelope itself but the
//! `Signature1` context structure: the CBOR array
//! `["Signature1", protected, external_aad, payload]` with an empty
//! external AAD. For the NZCP v1 profile the context string and protected
//! header are fixed, so the encoding is a constant prefix followed by the
//! payload byte string — but the payload's length header varies with the
//! payload, so it is recomputed generically here rather than hardcoded.
//!
//! Rebuilding this buffer incorrectly produces a verification failure, not
//! a decode error: the signature simply does not match. Fail closed.

use nzcp_core::{cbor, CborValue, DecodeError};
use nzcp_crypto::U256;

use crate::envelope::CoseEnvelope;

const SIG_CONTEXT: &str = "Signature1";

/// The exact byte sequence that was hashed and signed, plus the signature
/// halves as big-endian 256-bit integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToBeSigned {
    /// The encoded `Signature1` structure.
    pub bytes: Vec<u8>,
    /// The first 32 bytes of the signature.
    pub r: U256,
    /// The last 32 bytes of the signature.
    pub s: U256,
}

impl ToBeSigned {
    /// Reconstruct the signed byte sequence from a parsed envelope and
    /// split its signature into `r` and `s`.
    pub fn build(envelope: &CoseEnvelope) -> Self {
        let structure = CborValue::Array(vec![
            CborValue::Text(SIG_CONTEXT.to_string()),
            CborValue::Bytes(envelope.protected.clone()),
            CborValue::Bytes(Vec::new()),
            CborValue::Bytes(envelope.payload.clone()),
        ]);
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&envelope.signature[..32]);
        s.copy_from_slice(&envelope.signature[32..]);
        Self {
            bytes: cbor::encode(&structure),
            r: U256::from_be_bytes(&r),
            s: U256::from_be_bytes(&s),
        }
    }

    /// Decode a to-be-signed buffer back into its protected header and
    /// payload elements.
    pub fn split(bytes: &[u8]) -> Result<(Vec<u8>, Vec<u8>), DecodeError> {
        let value = cbor::decode_slice(bytes)?;
        let items = value
            .as_array()
            .ok_or_else(|| invalid("not a Signature1 array"))?;
        if items.len() != 4 {
            return Err(invalid(format!(
                "expected 4 Signature1 elements, found {}",
                items.len()
            )));
        }
        if items[0].as_text() != Some(SIG_CONTEXT) {
            return Err(invalid("missing Signature1 context string"));
        }
        let protected = items[1]
            .as_bytes()
            .ok_or_else(|| invalid("protected header is not a byte string"))?;
        let payload = items[3]
            .as_bytes()
            .ok_or_else(|| invalid("payload is not a byte string"))?;
        Ok((protected.to_vec(), payload.to_vec()))
    }

    /// The CWT payload element of a to-be-signed buffer.
    pub fn payload(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
        Ok(Self::split(bytes)?.1)
    }
}

fn invalid(message: impl Into<String>) -> DecodeError {
    DecodeError::InvalidEnvelope(message.into())
}
