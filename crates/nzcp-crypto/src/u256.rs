//! # U256 — Fixed-Width 256-Bit Modular Arithmetic
//!
//! A 256-bit unsigned integer over four little-endian 64-bit limbs, with
//! the modular operations ECDSA verification needs. Multiplication is an
//! interleaved double-and-add, so no intermediate ever exceeds 257 bits;
//! inversion is Fermat exponentiation and therefore requires a prime
//! modulus (both P-256 moduli are prime).
//!
//! Reduction shortcuts assume the modulus exceeds `2^255`, which holds for
//! both the P-256 field modulus and the group order: any raw 256-bit value
//! is then below `2m` and a single conditional subtraction folds it into
//! range.
//!
//! ## Serde
//!
//! Serializes as a lowercase 64-character hex string.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use nzcp_core::error::CryptoError;

/// A 256-bit unsigned integer, little-endian limbs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct U256 {
    limbs: [u64; 4],
}

impl U256 {
    /// The value zero.
    pub const ZERO: Self = Self::from_u64(0);
    /// The value one.
    pub const ONE: Self = Self::from_u64(1);

    /// Construct from little-endian 64-bit limbs.
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self { limbs }
    }

    /// Construct from a small value.
    pub const fn from_u64(value: u64) -> Self {
        Self {
            limbs: [value, 0, 0, 0],
        }
    }

    /// Interpret 32 bytes as a big-endian unsigned integer.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let offset = 32 - (i + 1) * 8;
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[offset..offset + 8]);
            *limb = u64::from_be_bytes(chunk);
        }
        Self { limbs }
    }

    /// Render as 32 big-endian bytes.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (i, limb) in self.limbs.iter().enumerate() {
            let offset = 32 - (i + 1) * 8;
            bytes[offset..offset + 8].copy_from_slice(&limb.to_be_bytes());
        }
        bytes
    }

    /// Parse from exactly 64 hex digits, with an optional `0x` prefix.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let hex = hex
            .strip_prefix("0x")
            .or_else(|| hex.strip_prefix("0X"))
            .unwrap_or(hex);
        if !hex.is_ascii() || hex.len() != 64 {
            return Err(CryptoError::KeyError(format!(
                "expected 64 hex digits, got {} chars",
                hex.chars().count()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16)
                .map_err(|e| CryptoError::KeyError(format!("invalid hex at position {}: {e}", 2 * i)))?;
        }
        Ok(Self::from_be_bytes(&bytes))
    }

    /// Render as a lowercase 64-character hex string.
    pub fn to_hex(&self) -> String {
        self.to_be_bytes().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// True when the value is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs == [0u64; 4]
    }

    /// The bit at `index` (0 = least significant).
    pub fn bit(&self, index: usize) -> bool {
        debug_assert!(index < 256);
        (self.limbs[index / 64] >> (index % 64)) & 1 == 1
    }

    fn overflowing_add(&self, rhs: &Self) -> (Self, bool) {
        let mut limbs = [0u64; 4];
        let mut carry = false;
        for i in 0..4 {
            let (sum, c1) = self.limbs[i].overflowing_add(rhs.limbs[i]);
            let (sum, c2) = sum.overflowing_add(u64::from(carry));
            limbs[i] = sum;
            carry = c1 | c2;
        }
        (Self { limbs }, carry)
    }

    fn overflowing_sub(&self, rhs: &Self) -> (Self, bool) {
        let mut limbs = [0u64; 4];
        let mut borrow = false;
        for i in 0..4 {
            let (diff, b1) = self.limbs[i].overflowing_sub(rhs.limbs[i]);
            let (diff, b2) = diff.overflowing_sub(u64::from(borrow));
            limbs[i] = diff;
            borrow = b1 | b2;
        }
        (Self { limbs }, borrow)
    }

    /// Fold a raw 256-bit value into `[0, m)` with one conditional
    /// subtraction. Valid because `m > 2^255`, so any 256-bit value is
    /// below `2m`.
    pub fn reduce_once(&self, modulus: &Self) -> Self {
        if self >= modulus {
            self.overflowing_sub(modulus).0
        } else {
            *self
        }
    }

    /// `(self + rhs) mod m`. Operands must already be reduced.
    pub fn add_mod(&self, rhs: &Self, modulus: &Self) -> Self {
        let (sum, carry) = self.overflowing_add(rhs);
        // The true sum is below 2m; on carry the wrapped subtraction of m
        // recovers it exactly.
        if carry || &sum >= modulus {
            sum.overflowing_sub(modulus).0
        } else {
            sum
        }
    }

    /// `(self - rhs) mod m`. Operands must already be reduced.
    pub fn sub_mod(&self, rhs: &Self, modulus: &Self) -> Self {
        if self >= rhs {
            self.overflowing_sub(rhs).0
        } else {
            // self + (m - rhs) < m, so no carry is possible.
            self.overflowing_add(&modulus.overflowing_sub(rhs).0).0
        }
    }

    /// `(2·self) mod m`.
    pub fn double_mod(&self, modulus: &Self) -> Self {
        self.add_mod(self, modulus)
    }

    /// `(self · rhs) mod m` by interleaved double-and-add over the 256
    /// multiplier bits. The loop structure is identical for every input;
    /// no intermediate exceeds 257 bits.
    pub fn mul_mod(&self, rhs: &Self, modulus: &Self) -> Self {
        let base = self.reduce_once(modulus);
        let mut acc = Self::ZERO;
        for i in (0..256).rev() {
            acc = acc.double_mod(modulus);
            if rhs.bit(i) {
                acc = acc.add_mod(&base, modulus);
            }
        }
        acc
    }

    /// `self^exponent mod m` by square-and-multiply, MSB first.
    pub fn pow_mod(&self, exponent: &Self, modulus: &Self) -> Self {
        let base = self.reduce_once(modulus);
        let mut acc = Self::ONE.reduce_once(modulus);
        for i in (0..256).rev() {
            acc = acc.mul_mod(&acc, modulus);
            if exponent.bit(i) {
                acc = acc.mul_mod(&base, modulus);
            }
        }
        acc
    }

    /// Modular inverse by Fermat's little theorem: `self^(m-2) mod m`.
    /// The modulus must be prime. Returns `None` for a zero operand, so
    /// division by zero is never performed.
    pub fn inv_mod(&self, modulus: &Self) -> Option<Self> {
        if self.reduce_once(modulus).is_zero() {
            return None;
        }
        let exponent = modulus.overflowing_sub(&Self::from_u64(2)).0;
        Some(self.pow_mod(&exponent, modulus))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..4).rev() {
            match self.limbs[i].cmp(&other.limbs[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Debug for U256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "U256(0x{})", self.to_hex())
    }
}

impl std::fmt::Display for U256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for U256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for U256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
