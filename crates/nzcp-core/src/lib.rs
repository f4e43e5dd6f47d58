//! # nzcp-core — Wire-Format Primitives for NZCP Verification
//!
//! This crate is the leaf of the NZCP verifier workspace. It defines the
//! decoding primitives every other crate builds on:
//!
//! - **Errors** (`error.rs`): the full failure taxonomy — structural decode
//!   errors, key-material errors, and verification outcomes.
//!
//! - **Cursor** (`cursor.rs`): a forward-only, bounds-checked reader over a
//!   borrowed byte buffer.
//!
//! - **Base32** (`base32.rs`): RFC 4648 codec without padding, the outer
//!   encoding of an NZCP pass URI.
//!
//! - **CBOR** (`cbor.rs`): a minimal RFC 7049 reader producing an owned
//!   [`CborValue`] tree, plus a minimal-length writer used to rebuild the
//!   COSE `Sig_structure`.
//!
//! - **Temporal** (`temporal.rs`): a UTC-only, seconds-precision
//!   [`Timestamp`] for CWT NumericDate claims and the injected
//!   verification clock.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `nzcp-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Decoding is deterministic: the same input always produces the same
//!   value tree or the same error.

pub mod base32;
pub mod cbor;
pub mod cursor;
pub mod error;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use cbor::CborValue;
pub use cursor::ByteCursor;
pub use error::{CryptoError, DecodeError, VerifyError};
pub use temporal::Timestamp;
