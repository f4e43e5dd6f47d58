//! # CWT Claims — Typed Extraction
//!
//! The CWT payload of an NZCP pass is a CBOR map keyed by the RFC 8392
//! integer claim keys, plus the text key `"vc"` holding the W3C
//! verifiable-credential object. Only the fields the verifier needs are
//! extracted; everything else in the `vc` object is ignored.
//!
//! Duplicate map keys resolve last-write-wins, matching the decoder.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nzcp_core::{cbor, CborValue, DecodeError, Timestamp};

const CLAIM_ISS: u64 = 1;
const CLAIM_EXP: u64 = 4;
const CLAIM_NBF: u64 = 5;
const CLAIM_CTI: u64 = 7;
const CLAIM_VC: &str = "vc";

/// The holder identity asserted by a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSubject {
    /// Given name(s).
    #[serde(rename = "givenName")]
    pub given_name: String,
    /// Family name.
    #[serde(rename = "familyName")]
    pub family_name: String,
    /// Date of birth, ISO 8601 date string.
    pub dob: String,
}

/// The signed claims of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The issuer identifier (`iss`).
    pub issuer: String,
    /// Start of the validity window (`nbf`).
    #[serde(rename = "notBefore")]
    pub not_before: Timestamp,
    /// End of the validity window (`exp`).
    pub expiry: Timestamp,
    /// Raw token identifier bytes (`cti`).
    pub jti: Vec<u8>,
    /// The nested credential subject.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: CredentialSubject,
}

impl Claims {
    /// Extract typed claims from an encoded CWT payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self, DecodeError> {
        let map = cbor::decode_slice(payload)?;
        if map.as_map().is_none() {
            return Err(malformed("payload is not a map"));
        }
        let issuer = map
            .map_get_unsigned(CLAIM_ISS)
            .and_then(CborValue::as_text)
            .ok_or_else(|| malformed("iss claim missing or not text"))?
            .to_string();
        let expiry = claim_timestamp(&map, CLAIM_EXP, "exp")?;
        let not_before = claim_timestamp(&map, CLAIM_NBF, "nbf")?;
        let jti = map
            .map_get_unsigned(CLAIM_CTI)
            .and_then(CborValue::as_bytes)
            .ok_or_else(|| malformed("cti claim missing or not bytes"))?
            .to_vec();
        let vc = map
            .map_get_text(CLAIM_VC)
            .ok_or_else(|| malformed("vc claim missing"))?;
        let subject = vc
            .map_get_text("credentialSubject")
            .ok_or_else(|| malformed("credentialSubject missing"))?;
        let credential_subject = CredentialSubject {
            given_name: subject_field(subject, "givenName")?,
            family_name: subject_field(subject, "familyName")?,
            dob: subject_field(subject, "dob")?,
        };
        Ok(Self {
            issuer,
            not_before,
            expiry,
            jti,
            credential_subject,
        })
    }

    /// Render the token identifier as `urn:uuid:…` when it is a 16-byte
    /// UUID — the NZCP `jti` form. `None` for any other length.
    pub fn jti_uri(&self) -> Option<String> {
        let bytes: [u8; 16] = self.jti.as_slice().try_into().ok()?;
        Some(format!("urn:uuid:{}", Uuid::from_bytes(bytes)))
    }
}

fn claim_timestamp(map: &CborValue, key: u64, name: &str) -> Result<Timestamp, DecodeError> {
    let secs = map
        .map_get_unsigned(key)
        .and_then(CborValue::as_unsigned)
        .ok_or_else(|| malformed(format!("{name} claim missing or not an unsigned integer")))?;
    let secs =
        i64::try_from(secs).map_err(|_| malformed(format!("{name} claim out of range")))?;
    Timestamp::from_epoch_secs(secs)
}

fn subject_field(subject: &CborValue, name: &str) -> Result<String, DecodeError> {
    Ok(subject
        .map_get_text(name)
        .and_then(CborValue::as_text)
        .ok_or_else(|| malformed(format!("credentialSubject.{name} missing or not text")))?
        .to_string())
}

fn malformed(message: impl Into<String>) -> DecodeError {
    DecodeError::MalformedClaims(message.into())
}
