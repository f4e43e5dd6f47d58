//! # Pass Verification — Policy and Orchestration
//!
//! `PassVerifier` composes the full pipeline: decode → signature check →
//! time window → claim extraction. Each call walks the same state machine
//! and terminates in either an accepted claims record or a typed
//! rejection; every failure is a deterministic function of the input, so
//! nothing is retried.
//!
//! Two deliberate relaxations from the formal NZCP specification are the
//! default, because the reference implementation (and its consumers)
//! depend on them: a pass whose `nbf` lies in the future is accepted, and
//! the protected-header `kid` is never cross-checked against the trust
//! anchor. [`VerificationPolicy::strict`] opts into full enforcement.

use nzcp_core::error::VerifyError;
use nzcp_core::Timestamp;
use nzcp_crypto::{ecdsa, sha256, U256};

use crate::claims::{Claims, CredentialSubject};
use crate::envelope::{self, CoseEnvelope};
use crate::registry::TrustedKeyRegistry;
use crate::sig_structure::ToBeSigned;

/// Verification strictness toggles. The default replicates the reference
/// behavior (both checks off).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerificationPolicy {
    /// Reject passes whose `nbf` claim is in the future.
    pub enforce_not_before: bool,
    /// Require the protected-header `kid` to match the trust anchor's
    /// configured key id.
    pub enforce_key_id: bool,
}

impl VerificationPolicy {
    /// The relaxed reference policy (the default).
    pub fn relaxed() -> Self {
        Self::default()
    }

    /// Enforce both the not-before window and the key-id match.
    pub fn strict() -> Self {
        Self {
            enforce_not_before: true,
            enforce_key_id: true,
        }
    }
}

/// Verifies passes against an immutable trust registry.
///
/// The verifier holds no mutable state; concurrent calls share it
/// read-only and the same inputs always produce the same outcome.
#[derive(Debug, Clone)]
pub struct PassVerifier {
    registry: TrustedKeyRegistry,
    policy: VerificationPolicy,
}

impl PassVerifier {
    /// A verifier with the relaxed default policy.
    pub fn new(registry: TrustedKeyRegistry) -> Self {
        Self {
            registry,
            policy: VerificationPolicy::default(),
        }
    }

    /// A verifier with an explicit policy.
    pub fn with_policy(registry: TrustedKeyRegistry, policy: VerificationPolicy) -> Self {
        Self { registry, policy }
    }

    /// The active policy.
    pub fn policy(&self) -> VerificationPolicy {
        self.policy
    }

    /// Verify a detached signature against the indexed trust anchor.
    ///
    /// Returns `Ok(false)` for a signature that does not verify;
    /// [`VerifyError::UnknownKeyIndex`] only when the index is absent.
    pub fn verify_signature(
        &self,
        message_hash: &[u8; 32],
        r: &U256,
        s: &U256,
        key_index: u32,
    ) -> Result<bool, VerifyError> {
        let anchor = self
            .registry
            .lookup(key_index)
            .ok_or(VerifyError::UnknownKeyIndex(key_index))?;
        Ok(ecdsa::verify(
            &U256::from_be_bytes(message_hash),
            r,
            s,
            &anchor.point,
        ))
    }

    /// Verify a to-be-signed buffer and return the credential subject.
    ///
    /// The buffer is hashed with SHA-256, the signature is checked against
    /// the indexed anchor, the CWT payload is recovered from the buffer,
    /// and the validity window is applied at `now`.
    pub fn read_credential_subject(
        &self,
        to_be_signed: &[u8],
        r: &U256,
        s: &U256,
        key_index: u32,
        now: Timestamp,
    ) -> Result<CredentialSubject, VerifyError> {
        let digest = sha256(to_be_signed);
        if !self.verify_signature(&digest, r, s, key_index)? {
            return Err(VerifyError::InvalidSignature);
        }
        let (protected, payload) = ToBeSigned::split(to_be_signed)?;
        let claims = Claims::from_payload(&payload)?;
        self.check_time_window(&claims, now)?;
        self.check_key_id(&protected, key_index)?;
        Ok(claims.credential_subject)
    }

    /// Verify a complete pass URI and return its claims.
    pub fn verify_pass(
        &self,
        raw: &str,
        key_index: u32,
        now: Timestamp,
    ) -> Result<Claims, VerifyError> {
        let bytes = envelope::decode_pass_payload(raw)?;
        let envelope = CoseEnvelope::parse(&bytes)?;
        let to_be_signed = ToBeSigned::build(&envelope);
        let digest = sha256(&to_be_signed.bytes);
        if !self.verify_signature(&digest, &to_be_signed.r, &to_be_signed.s, key_index)? {
            return Err(VerifyError::InvalidSignature);
        }
        let claims = Claims::from_payload(&envelope.payload)?;
        self.check_time_window(&claims, now)?;
        self.check_key_id(&envelope.protected, key_index)?;
        Ok(claims)
    }

    fn check_time_window(&self, claims: &Claims, now: Timestamp) -> Result<(), VerifyError> {
        if now >= claims.expiry {
            return Err(VerifyError::PassExpired {
                expiry: claims.expiry,
                now,
            });
        }
        if self.policy.enforce_not_before && now < claims.not_before {
            return Err(VerifyError::PassNotYetActive {
                not_before: claims.not_before,
                now,
            });
        }
        Ok(())
    }

    fn check_key_id(&self, protected: &[u8], key_index: u32) -> Result<(), VerifyError> {
        if !self.policy.enforce_key_id {
            return Ok(());
        }
        let anchor = self
            .registry
            .lookup(key_index)
            .ok_or(VerifyError::UnknownKeyIndex(key_index))?;
        // An anchor without a published kid has nothing to enforce.
        let Some(expected) = &anchor.key_id else {
            return Ok(());
        };
        let header = envelope::protected_key_id(protected);
        if header.as_deref() != Some(expected.as_str()) {
            return Err(VerifyError::KeyIdMismatch {
                header,
                anchor: expected.clone(),
            });
        }
        Ok(())
    }
}
