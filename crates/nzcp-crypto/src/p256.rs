//! # P-256 — Curve Constants and Point Arithmetic
//!
//! NIST P-256 (secp256r1): `y² = x³ - 3x + b` over the prime field `p`,
//! with prime group order `n`. Scalar multiplication is MSB-first
//! double-and-add over Jacobian coordinates, so a point operation never
//! needs a field inversion; a single inversion converts back to affine at
//! the end.
//!
//! The identity (point at infinity) exists only inside the Jacobian
//! representation (`z = 0`) during intermediate computation. Affine
//! [`CurvePoint`] values never encode it: operations that can produce the
//! identity return `None`, and a public key must always satisfy
//! [`CurvePoint::is_on_curve`].

use serde::{Deserialize, Serialize};

use crate::u256::U256;

/// The field modulus `p`.
pub const FIELD_MODULUS: U256 = U256::from_limbs([
    0xffff_ffff_ffff_ffff,
    0x0000_0000_ffff_ffff,
    0x0000_0000_0000_0000,
    0xffff_ffff_0000_0001,
]);

/// The group order `n`.
pub const CURVE_ORDER: U256 = U256::from_limbs([
    0xf3b9_cac2_fc63_2551,
    0xbce6_faad_a717_9e84,
    0xffff_ffff_ffff_ffff,
    0xffff_ffff_0000_0000,
]);

/// The curve coefficient `b`.
pub const CURVE_B: U256 = U256::from_limbs([
    0x3bce_3c3e_27d2_604b,
    0x651d_06b0_cc53_b0f6,
    0xb3eb_bd55_7698_86bc,
    0x5ac6_35d8_aa3a_93e7,
]);

/// The curve coefficient `a = p - 3`.
const CURVE_A: U256 = U256::from_limbs([
    0xffff_ffff_ffff_fffc,
    0x0000_0000_ffff_ffff,
    0x0000_0000_0000_0000,
    0xffff_ffff_0000_0001,
]);

/// The base point `G`.
pub const GENERATOR: CurvePoint = CurvePoint {
    x: U256::from_limbs([
        0xf4a1_3945_d898_c296,
        0x7703_7d81_2deb_33a0,
        0xf8bc_e6e5_63a4_40f2,
        0x6b17_d1f2_e12c_4247,
    ]),
    y: U256::from_limbs([
        0xcbb6_4068_37bf_51f5,
        0x2bce_3357_6b31_5ece,
        0x8ee7_eb4a_7c0f_9e16,
        0x4fe3_42e2_fe1a_7f9b,
    ]),
};

/// An affine point on P-256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// x coordinate.
    pub x: U256,
    /// y coordinate.
    pub y: U256,
}

impl CurvePoint {
    /// Construct a point from raw coordinates. The result is not checked;
    /// call [`CurvePoint::is_on_curve`] before trusting it as a key.
    pub fn new(x: U256, y: U256) -> Self {
        Self { x, y }
    }

    /// Check `y² ≡ x³ - 3x + b (mod p)` with both coordinates in field
    /// range.
    pub fn is_on_curve(&self) -> bool {
        let p = &FIELD_MODULUS;
        if &self.x >= p || &self.y >= p {
            return false;
        }
        let y2 = self.y.mul_mod(&self.y, p);
        let x2 = self.x.mul_mod(&self.x, p);
        let rhs = x2
            .add_mod(&CURVE_A, p)
            .mul_mod(&self.x, p)
            .add_mod(&CURVE_B, p);
        y2 == rhs
    }
}

/// Internal Jacobian point; `z = 0` encodes the identity.
#[derive(Debug, Clone, Copy)]
struct JacobianPoint {
    x: U256,
    y: U256,
    z: U256,
}

impl JacobianPoint {
    const IDENTITY: Self = Self {
        x: U256::ONE,
        y: U256::ONE,
        z: U256::ZERO,
    };

    fn from_affine(point: &CurvePoint) -> Self {
        Self {
            x: point.x,
            y: point.y,
            z: U256::ONE,
        }
    }

    fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    /// Point doubling, `a = -3` formulas (dbl-2001-b).
    fn double(&self) -> Self {
        if self.is_identity() || self.y.is_zero() {
            return Self::IDENTITY;
        }
        let p = &FIELD_MODULUS;
        let delta = self.z.mul_mod(&self.z, p);
        let gamma = self.y.mul_mod(&self.y, p);
        let beta = self.x.mul_mod(&gamma, p);
        let t = self
            .x
            .sub_mod(&delta, p)
            .mul_mod(&self.x.add_mod(&delta, p), p);
        let alpha = t.double_mod(p).add_mod(&t, p);
        let beta4 = beta.double_mod(p).double_mod(p);
        let beta8 = beta4.double_mod(p);
        let x3 = alpha.mul_mod(&alpha, p).sub_mod(&beta8, p);
        let z3 = self.y.add_mod(&self.z, p);
        let z3 = z3
            .mul_mod(&z3, p)
            .sub_mod(&gamma, p)
            .sub_mod(&delta, p);
        let gamma2 = gamma.mul_mod(&gamma, p);
        let gamma2_8 = gamma2.double_mod(p).double_mod(p).double_mod(p);
        let y3 = alpha
            .mul_mod(&beta4.sub_mod(&x3, p), p)
            .sub_mod(&gamma2_8, p);
        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// General point addition. Adding a point to itself delegates to
    /// [`JacobianPoint::double`]; adding a point to its negation yields
    /// the identity.
    fn add(&self, other: &Self) -> Self {
        if self.is_identity() {
            return *other;
        }
        if other.is_identity() {
            return *self;
        }
        let p = &FIELD_MODULUS;
        let z1z1 = self.z.mul_mod(&self.z, p);
        let z2z2 = other.z.mul_mod(&other.z, p);
        let u1 = self.x.mul_mod(&z2z2, p);
        let u2 = other.x.mul_mod(&z1z1, p);
        let s1 = self.y.mul_mod(&z2z2, p).mul_mod(&other.z, p);
        let s2 = other.y.mul_mod(&z1z1, p).mul_mod(&self.z, p);
        if u1 == u2 {
            if s1 == s2 {
                return self.double();
            }
            return Self::IDENTITY;
        }
        let h = u2.sub_mod(&u1, p);
        let r = s2.sub_mod(&s1, p);
        let h2 = h.mul_mod(&h, p);
        let h3 = h2.mul_mod(&h, p);
        let u1h2 = u1.mul_mod(&h2, p);
        let x3 = r
            .mul_mod(&r, p)
            .sub_mod(&h3, p)
            .sub_mod(&u1h2.double_mod(p), p);
        let y3 = r
            .mul_mod(&u1h2.sub_mod(&x3, p), p)
            .sub_mod(&s1.mul_mod(&h3, p), p);
        let z3 = self.z.mul_mod(&other.z, p).mul_mod(&h, p);
        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    fn to_affine(&self) -> Option<CurvePoint> {
        let p = &FIELD_MODULUS;
        let z_inv = self.z.inv_mod(p)?;
        let z_inv2 = z_inv.mul_mod(&z_inv, p);
        Some(CurvePoint {
            x: self.x.mul_mod(&z_inv2, p),
            y: self.y.mul_mod(&z_inv2.mul_mod(&z_inv, p), p),
        })
    }
}

/// `k · point` by MSB-first double-and-add. Returns `None` when the result
/// is the identity (`k ≡ 0 mod n`).
pub fn scalar_mul(k: &U256, point: &CurvePoint) -> Option<CurvePoint> {
    let base = JacobianPoint::from_affine(point);
    let mut acc = JacobianPoint::IDENTITY;
    for i in (0..256).rev() {
        acc = acc.double();
        if k.bit(i) {
            acc = acc.add(&base);
        }
    }
    acc.to_affine()
}

/// `k · G`.
pub fn base_mul(k: &U256) -> Option<CurvePoint> {
    scalar_mul(k, &GENERATOR)
}

/// Affine point addition. Returns `None` when the sum is the identity.
pub fn add(a: &CurvePoint, b: &CurvePoint) -> Option<CurvePoint> {
    JacobianPoint::from_affine(a)
        .add(&JacobianPoint::from_affine(b))
        .to_affine()
}
