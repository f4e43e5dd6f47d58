//! # COSE_Sign1 Envelope
//!
//! An NZCP pass URI is `NZCP:/<version>/<base32>`. The decoded payload is
//! the one-byte CBOR tag for COSE_Sign1 (`0xd2`) followed by a 4-element
//! array `[protected: bstr, unprotected: map, payload: bstr,
//! signature: bstr]`. The NZCP profile requires the unprotected header to
//! be empty and the signature to be exactly 64 bytes (`r ‖ s`); a length
//! violation is a decode error, not a verification failure.
//!
//! Protected header bytes are carried forward verbatim — they participate
//! in the signed buffer and are otherwise uninterpreted, except for the
//! optional `kid` lookup used by the strict key-id policy.

use nzcp_core::{base32, cbor, ByteCursor, DecodeError};

/// The one-byte encoding of CBOR tag 18 (COSE_Sign1).
pub const COSE_SIGN1_TAG: u8 = 0xd2;

const URI_PREFIX: &str = "NZCP:/";
const SUPPORTED_VERSION: &str = "1";

/// Strip the `NZCP:/<version>/` prefix and base32-decode the payload.
pub fn decode_pass_payload(raw: &str) -> Result<Vec<u8>, DecodeError> {
    let rest = raw
        .strip_prefix(URI_PREFIX)
        .ok_or_else(|| DecodeError::MalformedUri("missing NZCP:/ prefix".to_string()))?;
    let (version, payload) = rest
        .split_once('/')
        .ok_or_else(|| DecodeError::MalformedUri("missing version segment".to_string()))?;
    if version != SUPPORTED_VERSION {
        return Err(DecodeError::MalformedUri(format!(
            "unsupported version {version:?}"
        )));
    }
    base32::decode(payload)
}

/// A parsed COSE_Sign1 envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoseEnvelope {
    /// Protected header bytes, verbatim.
    pub protected: Vec<u8>,
    /// The CWT claims payload.
    pub payload: Vec<u8>,
    /// The raw signature: 32 bytes of `r` followed by 32 bytes of `s`.
    pub signature: [u8; 64],
}

impl CoseEnvelope {
    /// Parse the decoded pass bytes into an envelope.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = ByteCursor::new(bytes);
        let tag = cursor.read_u8()?;
        if tag != COSE_SIGN1_TAG {
            return Err(invalid(format!(
                "expected COSE_Sign1 tag 0xd2, found {tag:#04x}"
            )));
        }
        let value = cbor::decode(&mut cursor)?;
        let items = value
            .as_array()
            .ok_or_else(|| invalid("top-level item is not an array"))?;
        if items.len() != 4 {
            return Err(invalid(format!(
                "expected a 4-element array, found {} elements",
                items.len()
            )));
        }
        let protected = items[0]
            .as_bytes()
            .ok_or_else(|| invalid("protected header is not a byte string"))?;
        let unprotected = items[1]
            .as_map()
            .ok_or_else(|| invalid("unprotected header is not a map"))?;
        if !unprotected.is_empty() {
            return Err(invalid("unprotected header map is not empty"));
        }
        let payload = items[2]
            .as_bytes()
            .ok_or_else(|| invalid("payload is not a byte string"))?;
        let signature_bytes = items[3]
            .as_bytes()
            .ok_or_else(|| invalid("signature is not a byte string"))?;
        let signature: [u8; 64] = signature_bytes.try_into().map_err(|_| {
            invalid(format!(
                "signature must be 64 bytes, found {}",
                signature_bytes.len()
            ))
        })?;
        Ok(Self {
            protected: protected.to_vec(),
            payload: payload.to_vec(),
            signature,
        })
    }

    /// The `kid` (label 4) from the protected header, as UTF-8 text.
    pub fn key_id(&self) -> Option<String> {
        protected_key_id(&self.protected)
    }
}

/// Decode a protected header and return its `kid` (label 4) as text.
pub fn protected_key_id(protected: &[u8]) -> Option<String> {
    let header = cbor::decode_slice(protected).ok()?;
    let kid = header.map_get_unsigned(4)?.as_bytes()?;
    Some(String::from_utf8_lossy(kid).into_owned())
}

fn invalid(message: impl Into<String>) -> DecodeError {
    DecodeError::InvalidEnvelope(message.into())
}
