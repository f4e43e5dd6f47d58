//! # End-to-End Pass Verification Tests
//!
//! These tests build complete passes — CWT payload, COSE_Sign1 envelope,
//! base32 URI — and sign them with a real ECDSA signing fixture over the
//! crate's own curve arithmetic. No cryptographic operation is mocked:
//! every accepted pass here carries a genuine P-256 signature, and every
//! rejection exercises the same code path a hostile input would.

use nzcp_core::error::{DecodeError, VerifyError};
use nzcp_core::{base32, cbor, CborValue, Timestamp};
use nzcp_crypto::p256::{base_mul, CurvePoint, CURVE_ORDER};
use nzcp_crypto::{message_hash, U256};
use nzcp_pass::envelope::COSE_SIGN1_TAG;
use nzcp_pass::{
    CoseEnvelope, PassVerifier, ToBeSigned, TrustAnchor, TrustedKeyRegistry, VerificationPolicy,
};

/// Fixed verification instant for deterministic outcomes.
const NOW: i64 = 1_700_000_000;

const ISSUER: &str = "did:web:nzcp.covid19.health.nz";

fn ts(secs: i64) -> Timestamp {
    Timestamp::from_epoch_secs(secs).unwrap()
}

fn private_key() -> U256 {
    U256::from_u64(0x1234_5678_9abc_def1)
}

fn signing_nonce() -> U256 {
    U256::from_u64(0x0fed_cba9_8765_4321)
}

fn public_point() -> CurvePoint {
    base_mul(&private_key()).unwrap()
}

/// Plain ECDSA signing over the crate's own arithmetic, used only to
/// produce test fixtures: `r = (k·G).x mod n`, `s = k⁻¹(e + r·d) mod n`.
fn sign(e: &U256) -> (U256, U256) {
    let n = &CURVE_ORDER;
    let k = signing_nonce();
    let r = base_mul(&k).unwrap().x.reduce_once(n);
    assert!(!r.is_zero());
    let s = k
        .inv_mod(n)
        .unwrap()
        .mul_mod(&e.add_mod(&r.mul_mod(&private_key(), n), n), n);
    assert!(!s.is_zero());
    (r, s)
}

fn text(s: &str) -> CborValue {
    CborValue::Text(s.to_string())
}

fn protected_header(kid: &str) -> Vec<u8> {
    cbor::encode(&CborValue::Map(vec![
        (
            CborValue::Unsigned(4),
            CborValue::Bytes(kid.as_bytes().to_vec()),
        ),
        (CborValue::Unsigned(1), CborValue::Negative(-7)),
    ]))
}

fn payload_bytes(exp: i64, nbf: i64) -> Vec<u8> {
    let subject = CborValue::Map(vec![
        (text("givenName"), text("Jack")),
        (text("familyName"), text("Sparrow")),
        (text("dob"), text("1960-04-16")),
    ]);
    cbor::encode(&CborValue::Map(vec![
        (CborValue::Unsigned(1), text(ISSUER)),
        (CborValue::Unsigned(5), CborValue::Unsigned(nbf as u64)),
        (CborValue::Unsigned(4), CborValue::Unsigned(exp as u64)),
        (CborValue::Unsigned(7), CborValue::Bytes(vec![0x60; 16])),
        (
            text("vc"),
            CborValue::Map(vec![(text("credentialSubject"), subject)]),
        ),
    ]))
}

/// Assemble and sign a complete pass, returning the raw envelope bytes.
fn signed_envelope_bytes(exp: i64, nbf: i64, kid: &str) -> Vec<u8> {
    let protected = protected_header(kid);
    let payload = payload_bytes(exp, nbf);
    let unsigned = CoseEnvelope {
        protected: protected.clone(),
        payload: payload.clone(),
        signature: [0; 64],
    };
    let to_be_signed = ToBeSigned::build(&unsigned);
    let e = message_hash(&to_be_signed.bytes).reduce_once(&CURVE_ORDER);
    let (r, s) = sign(&e);
    let mut signature = [0u8; 64];
    signature[..32].copy_from_slice(&r.to_be_bytes());
    signature[32..].copy_from_slice(&s.to_be_bytes());
    let envelope = CborValue::Array(vec![
        CborValue::Bytes(protected),
        CborValue::Map(vec![]),
        CborValue::Bytes(payload),
        CborValue::Bytes(signature.to_vec()),
    ]);
    let mut bytes = vec![COSE_SIGN1_TAG];
    bytes.extend_from_slice(&cbor::encode(&envelope));
    bytes
}

fn uri_from(bytes: &[u8]) -> String {
    format!("NZCP:/1/{}", base32::encode(bytes))
}

fn pass_uri(exp: i64, nbf: i64) -> String {
    uri_from(&signed_envelope_bytes(exp, nbf, "key-1"))
}

fn registry() -> TrustedKeyRegistry {
    TrustedKeyRegistry::from_anchors([(1, TrustAnchor::with_key_id(public_point(), "key-1"))])
        .unwrap()
}

fn verifier() -> PassVerifier {
    PassVerifier::new(registry())
}

fn strict_verifier() -> PassVerifier {
    PassVerifier::with_policy(registry(), VerificationPolicy::strict())
}

#[test]
fn test_valid_pass_end_to_end() {
    let claims = verifier()
        .verify_pass(&pass_uri(NOW + 10_000, NOW - 1_000), 1, ts(NOW))
        .unwrap();
    assert_eq!(claims.issuer, ISSUER);
    assert_eq!(claims.credential_subject.given_name, "Jack");
    assert_eq!(claims.credential_subject.family_name, "Sparrow");
    assert_eq!(claims.credential_subject.dob, "1960-04-16");
    assert_eq!(
        claims.jti_uri().unwrap(),
        "urn:uuid:60606060-6060-6060-6060-606060606060"
    );
}

#[test]
fn test_read_credential_subject_from_to_be_signed() {
    let bytes = signed_envelope_bytes(NOW + 10_000, NOW - 1_000, "key-1");
    let envelope = CoseEnvelope::parse(&bytes).unwrap();
    let to_be_signed = ToBeSigned::build(&envelope);
    let subject = verifier()
        .read_credential_subject(
            &to_be_signed.bytes,
            &to_be_signed.r,
            &to_be_signed.s,
            1,
            ts(NOW),
        )
        .unwrap();
    assert_eq!(subject.given_name, "Jack");
    assert_eq!(subject.family_name, "Sparrow");
    assert_eq!(subject.dob, "1960-04-16");
}

#[test]
fn test_tampered_signature_rejected() {
    let mut bytes = signed_envelope_bytes(NOW + 10_000, NOW - 1_000, "key-1");
    // The signature byte string is the final envelope element; zero the
    // leading bytes of r.
    let len = bytes.len();
    bytes[len - 64..len - 56].fill(0);
    let err = verifier()
        .verify_pass(&uri_from(&bytes), 1, ts(NOW))
        .unwrap_err();
    assert_eq!(err, VerifyError::InvalidSignature);
}

#[test]
fn test_tampered_payload_rejected() {
    let mut bytes = signed_envelope_bytes(NOW + 10_000, NOW - 1_000, "key-1");
    // Rewrite the holder's family name in place; the signature no longer
    // covers the bytes.
    let at = bytes
        .windows(7)
        .position(|window| window == b"Sparrow")
        .unwrap();
    bytes[at..at + 7].copy_from_slice(b"Sparroz");
    let err = verifier()
        .verify_pass(&uri_from(&bytes), 1, ts(NOW))
        .unwrap_err();
    assert_eq!(err, VerifyError::InvalidSignature);
}

#[test]
fn test_wrong_trust_anchor_rejected() {
    let other_key = base_mul(&U256::from_u64(99)).unwrap();
    let registry =
        TrustedKeyRegistry::from_anchors([(1, TrustAnchor::with_key_id(other_key, "key-1"))])
            .unwrap();
    let err = PassVerifier::new(registry)
        .verify_pass(&pass_uri(NOW + 10_000, NOW - 1_000), 1, ts(NOW))
        .unwrap_err();
    assert_eq!(err, VerifyError::InvalidSignature);
}

#[test]
fn test_unknown_key_index_rejected() {
    let err = verifier()
        .verify_pass(&pass_uri(NOW + 10_000, NOW - 1_000), 42, ts(NOW))
        .unwrap_err();
    assert_eq!(err, VerifyError::UnknownKeyIndex(42));
}

#[test]
fn test_expired_pass_rejected_despite_valid_signature() {
    let err = verifier()
        .verify_pass(&pass_uri(NOW - 100, NOW - 1_000), 1, ts(NOW))
        .unwrap_err();
    assert!(matches!(err, VerifyError::PassExpired { .. }));
}

#[test]
fn test_expiry_boundary() {
    let v = verifier();
    // Expiry exactly at, and one second before, the verification instant
    // both reject; one second after verifies.
    for exp in [NOW, NOW - 1] {
        let err = v
            .verify_pass(&pass_uri(exp, NOW - 1_000), 1, ts(NOW))
            .unwrap_err();
        assert!(matches!(err, VerifyError::PassExpired { .. }), "exp {exp}");
    }
    assert!(v.verify_pass(&pass_uri(NOW + 1, NOW - 1_000), 1, ts(NOW)).is_ok());
}

#[test]
fn test_future_not_before_accepted_by_default() {
    let claims = verifier()
        .verify_pass(&pass_uri(NOW + 10_000, NOW + 5_000), 1, ts(NOW))
        .unwrap();
    assert_eq!(claims.not_before, ts(NOW + 5_000));
}

#[test]
fn test_future_not_before_rejected_under_strict_policy() {
    let err = strict_verifier()
        .verify_pass(&pass_uri(NOW + 10_000, NOW + 5_000), 1, ts(NOW))
        .unwrap_err();
    assert_eq!(
        err,
        VerifyError::PassNotYetActive {
            not_before: ts(NOW + 5_000),
            now: ts(NOW),
        }
    );
}

#[test]
fn test_mismatched_kid_accepted_by_default() {
    let bytes = signed_envelope_bytes(NOW + 10_000, NOW - 1_000, "key-2");
    assert!(verifier().verify_pass(&uri_from(&bytes), 1, ts(NOW)).is_ok());
}

#[test]
fn test_mismatched_kid_rejected_under_strict_policy() {
    let bytes = signed_envelope_bytes(NOW + 10_000, NOW - 1_000, "key-2");
    let err = strict_verifier()
        .verify_pass(&uri_from(&bytes), 1, ts(NOW))
        .unwrap_err();
    assert_eq!(
        err,
        VerifyError::KeyIdMismatch {
            header: Some("key-2".to_string()),
            anchor: "key-1".to_string(),
        }
    );
}

#[test]
fn test_strict_policy_accepts_conforming_pass() {
    assert!(strict_verifier()
        .verify_pass(&pass_uri(NOW + 10_000, NOW - 1_000), 1, ts(NOW))
        .is_ok());
}

#[test]
fn test_verification_is_idempotent() {
    let v = verifier();
    let uri = pass_uri(NOW + 10_000, NOW - 1_000);
    let first = v.verify_pass(&uri, 1, ts(NOW)).unwrap();
    let second = v.verify_pass(&uri, 1, ts(NOW)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_malformed_uri_rejected() {
    let err = verifier().verify_pass("garbage", 1, ts(NOW)).unwrap_err();
    assert!(matches!(
        err,
        VerifyError::Decode(DecodeError::MalformedUri(_))
    ));
}

#[test]
fn test_corrupt_base32_rejected() {
    let err = verifier()
        .verify_pass("NZCP:/1/abc!", 1, ts(NOW))
        .unwrap_err();
    assert!(matches!(
        err,
        VerifyError::Decode(DecodeError::MalformedEncoding(_))
    ));
}

#[test]
fn test_truncated_envelope_rejected() {
    let bytes = signed_envelope_bytes(NOW + 10_000, NOW - 1_000, "key-1");
    let err = verifier()
        .verify_pass(&uri_from(&bytes[..bytes.len() - 80]), 1, ts(NOW))
        .unwrap_err();
    assert!(matches!(err, VerifyError::Decode(_)));
}