//! # Error Types — Verification Failure Taxonomy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations, and all are terminal: every failure is a deterministic
//! function of the input, so nothing is retried.
//!
//! ## Design
//!
//! - Structural decode failures ([`DecodeError`]) are surfaced immediately
//!   with no partial result.
//! - [`VerifyError::InvalidSignature`] and [`VerifyError::PassExpired`] are
//!   the only errors expected in normal adversarial use (tampered or
//!   outdated passes) and stay distinguishable from decode errors so
//!   callers can log or rate-limit them differently.
//! - This crate does not log; the caller owns error presentation.

use thiserror::Error;

use crate::temporal::Timestamp;

/// Structural failure while decoding the wire encoding of a pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Pass text is not of the form `NZCP:/<version>/<payload>` or carries
    /// an unsupported version segment.
    #[error("malformed pass URI: {0}")]
    MalformedUri(String),

    /// Base32 input contains a character outside `A-Z2-7`.
    #[error("invalid base32 character at position {0}")]
    MalformedEncoding(usize),

    /// A read ran past the end of the input buffer.
    #[error("truncated input")]
    TruncatedInput,

    /// CBOR major type 6 or 7, or an additional-information value the
    /// decoder does not handle.
    #[error("unsupported CBOR item (major type {major}, additional info {info})")]
    UnsupportedCborType {
        /// The three-bit major type of the offending item.
        major: u8,
        /// The five-bit additional-information field of the offending item.
        info: u8,
    },

    /// CBOR arrays/maps nested beyond the decoder's depth cap.
    #[error("CBOR nesting exceeds depth limit")]
    NestingTooDeep,

    /// COSE_Sign1 tag mismatch, wrong array shape, non-empty unprotected
    /// header, or a signature that is not exactly 64 bytes.
    #[error("invalid COSE_Sign1 envelope: {0}")]
    InvalidEnvelope(String),

    /// The CWT payload decoded as CBOR but a claim is missing or mistyped.
    #[error("malformed claims: {0}")]
    MalformedClaims(String),
}

/// Error in key-material handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key parsing or curve-point validation failed.
    #[error("key error: {0}")]
    KeyError(String),
}

/// Terminal outcome for a pass that failed verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Requested trust-anchor index is not present in the registry.
    #[error("unknown trusted key index {0}")]
    UnknownKeyIndex(u32),

    /// Cryptographic verification returned false. Covers a bad public key,
    /// tampered payload, tampered signature, or the wrong key selected.
    #[error("signature verification failed")]
    InvalidSignature,

    /// The verification time is at or past the pass expiry.
    #[error("pass expired at {expiry} (verified at {now})")]
    PassExpired {
        /// The `exp` claim of the pass.
        expiry: Timestamp,
        /// The injected verification time.
        now: Timestamp,
    },

    /// The pass is not yet within its validity window. Raised only when
    /// the strict not-before policy is enabled; the default policy accepts
    /// passes whose `nbf` is in the future.
    #[error("pass not active until {not_before} (verified at {now})")]
    PassNotYetActive {
        /// The `nbf` claim of the pass.
        not_before: Timestamp,
        /// The injected verification time.
        now: Timestamp,
    },

    /// Protected-header key id differs from the trust anchor's configured
    /// key id. Raised only when the strict key-id policy is enabled; the
    /// default policy never cross-checks the header `kid`.
    #[error("protected header kid {header:?} does not match trust anchor kid {anchor:?}")]
    KeyIdMismatch {
        /// The `kid` found in the protected header, if any.
        header: Option<String>,
        /// The key id configured on the trust anchor.
        anchor: String,
    },

    /// Structural decode failure, propagated unchanged.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
