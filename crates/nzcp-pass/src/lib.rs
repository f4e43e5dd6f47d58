//! # nzcp-pass — Offline Verification of New Zealand COVID Passes
//!
//! Composes the wire-format primitives from `nzcp-core` and the
//! cryptography from `nzcp-crypto` into the full verification pipeline:
//!
//! - **Envelope** (`envelope.rs`): pass URI decoding and the COSE_Sign1
//!   envelope structure.
//!
//! - **Sig_structure** (`sig_structure.rs`): reconstruction of the exact
//!   byte sequence that was signed, and the r/s signature split.
//!
//! - **Claims** (`claims.rs`): typed CWT claims — issuer, validity window,
//!   token id, and the credential subject.
//!
//! - **Registry** (`registry.rs`): the immutable index → public key trust
//!   table supplied by the host at initialization.
//!
//! - **Verifier** (`verifier.rs`): the orchestrator and its strictness
//!   policy.
//!
//! Data flows strictly downward: pass text → bytes → envelope →
//! to-be-signed buffer → signature verification → time window → claims.
//! Every verification call is an independent pure computation; the only
//! shared state is the read-only registry.

pub mod claims;
pub mod envelope;
pub mod registry;
pub mod sig_structure;
pub mod verifier;

pub use claims::{Claims, CredentialSubject};
pub use envelope::CoseEnvelope;
pub use registry::{TrustAnchor, TrustedKeyRegistry};
pub use sig_structure::ToBeSigned;
pub use verifier::{PassVerifier, VerificationPolicy};
