//! # ECDSA — P-256 Signature Verification
//!
//! Standard ECDSA verification over NIST P-256. Every rejection — an
//! out-of-range `r`/`s`, a public key off the curve, a failed equation
//! check — returns `false` rather than an error: an invalid-range
//! signature is simply non-verifying, and the caller decides what a
//! `false` means.
//!
//! All inputs are public data (hash, signature, public key), so the
//! branching here leaks nothing secret.

use crate::p256::{self, CurvePoint, CURVE_ORDER};
use crate::u256::U256;

/// Verify an ECDSA signature `(r, s)` over `message_hash` against
/// `public_key`.
///
/// 1. Reject `r` or `s` outside `[1, n-1]`.
/// 2. Reject a public key that is not a valid curve point.
/// 3. `w = s⁻¹ mod n`, `u1 = e·w mod n`, `u2 = r·w mod n` where `e` is the
///    hash reduced mod `n`.
/// 4. Accept iff `u1·G + u2·Q` is not the identity and its x coordinate,
///    reduced mod `n`, equals `r`.
pub fn verify(message_hash: &U256, r: &U256, s: &U256, public_key: &CurvePoint) -> bool {
    let n = &CURVE_ORDER;
    if r.is_zero() || s.is_zero() || r >= n || s >= n {
        return false;
    }
    if !public_key.is_on_curve() {
        return false;
    }
    let e = message_hash.reduce_once(n);
    let Some(w) = s.inv_mod(n) else {
        // Unreachable after the range check; kept as a zero-divide guard.
        return false;
    };
    let u1 = e.mul_mod(&w, n);
    let u2 = r.mul_mod(&w, n);
    let sum = match (p256::base_mul(&u1), p256::scalar_mul(&u2, public_key)) {
        (Some(a), Some(b)) => p256::add(&a, &b),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    };
    match sum {
        Some(point) => point.x.reduce_once(n) == *r,
        None => false,
    }
}
