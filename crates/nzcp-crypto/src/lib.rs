//! # nzcp-crypto — Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for NZCP verification:
//!
//! - **U256** (`u256.rs`): a fixed-width 256-bit unsigned integer with
//!   modular add/sub/mul/pow/inverse. No arbitrary-precision bignum; every
//!   operation stays within 257 bits of working width.
//!
//! - **P-256** (`p256.rs`): NIST P-256 curve constants and point
//!   arithmetic — Jacobian doubling and addition, double-and-add scalar
//!   multiplication.
//!
//! - **ECDSA** (`ecdsa.rs`): signature verification over P-256.
//!
//! - **SHA-256** (`sha256.rs`): message digest computation over the `sha2`
//!   crate.
//!
//! ## Crate Policy
//!
//! - Depends only on `nzcp-core` internally.
//! - Verification operates on public data only: signatures, hashes, and
//!   public keys. No private-key material exists anywhere in this crate.
//! - Modular inversion is guarded against a zero operand; division by
//!   zero is unreachable.
//! - No mocking of cryptographic operations in tests.

pub mod ecdsa;
pub mod p256;
pub mod sha256;
pub mod u256;

pub use p256::CurvePoint;
pub use sha256::{message_hash, sha256};
pub use u256::U256;
