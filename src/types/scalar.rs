// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! 256-bit unsigned axis value.

use crate::config::{AXIS_BITS, AXIS_BYTES};
use crate::error::{KernelError, Result};
use crate::types::delta::AxisDelta;
use num_bigint::BigUint;
use num_traits::{CheckedSub, Num, One, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One axis position. Always in `[0, 2^256)`; every constructor enforces it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Scalar(pub(crate) BigUint);

impl Scalar {
    pub fn zero() -> Self {
        Scalar(BigUint::zero())
    }

    pub fn from_u64(v: u64) -> Self {
        Scalar(BigUint::from(v))
    }

    /// Largest representable axis value, `2^256 - 1`.
    pub fn max_value() -> Self {
        Scalar((BigUint::one() << AXIS_BITS as usize) - 1u32)
    }

    pub fn from_biguint(v: BigUint) -> Result<Self> {
        if v.bits() > AXIS_BITS as u64 {
            return Err(KernelError::Parse(format!("value exceeds {AXIS_BITS} bits")));
        }
        Ok(Scalar(v))
    }

    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_biguint(BigUint::from_bytes_be(bytes))
    }

    /// Parses a decimal string, or hex when prefixed with `0x`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(rest) => (rest, 16),
            None => (s, 10),
        };
        if digits.is_empty() {
            return Err(KernelError::Parse("empty axis value".into()));
        }
        let v = BigUint::from_str_radix(digits, radix)
            .map_err(|e| KernelError::Parse(format!("invalid axis value {s:?}: {e}")))?;
        Self::from_biguint(v)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn to_biguint(&self) -> BigUint {
        self.0.clone()
    }

    /// Fixed 32-byte big-endian form.
    pub fn to_be_bytes(&self) -> [u8; AXIS_BYTES] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; AXIS_BYTES];
        // bits() <= 256 so raw never exceeds 32 bytes
        let start = AXIS_BYTES.saturating_sub(raw.len());
        out[start..].copy_from_slice(&raw[raw.len().saturating_sub(AXIS_BYTES)..]);
        out
    }

    pub fn bit_len(&self) -> u32 {
        self.0.bits() as u32
    }

    /// Bit `i` counted from the least-significant end.
    pub fn bit(&self, i: u32) -> bool {
        !((&self.0 >> i as usize) & BigUint::one()).is_zero()
    }

    /// Logical right shift; shifting by 256 or more yields zero.
    pub fn shr(&self, n: u32) -> Scalar {
        Scalar(&self.0 >> n as usize)
    }

    /// Clears the low `n` bits: the base of the aligned `2^n` block holding `self`.
    pub fn align_down(&self, n: u32) -> Scalar {
        Scalar((&self.0 >> n as usize) << n as usize)
    }

    pub fn xor(&self, other: &Scalar) -> Scalar {
        Scalar(&self.0 ^ &other.0)
    }

    pub fn checked_add(&self, rhs: &BigUint) -> Option<Scalar> {
        Self::from_biguint(&self.0 + rhs).ok()
    }

    pub fn checked_sub(&self, rhs: &BigUint) -> Option<Scalar> {
        self.0.checked_sub(rhs).map(Scalar)
    }

    /// Applies a signed offset without wrapping.
    pub fn checked_offset(&self, delta: &AxisDelta) -> Option<Scalar> {
        if delta.is_negative() {
            self.checked_sub(delta.magnitude())
        } else {
            self.checked_add(delta.magnitude())
        }
    }

    /// Signed distance `target - self`.
    pub fn delta_to(&self, target: &Scalar) -> AxisDelta {
        if target.0 >= self.0 {
            AxisDelta::new(false, &target.0 - &self.0)
        } else {
            AxisDelta::new(true, &self.0 - &target.0)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::from_u64(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::LowerHex for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_str_radix(10))
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Scalar::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_and_hex() {
        assert_eq!(Scalar::parse("255").unwrap(), Scalar::from_u64(255));
        assert_eq!(Scalar::parse("0xff").unwrap(), Scalar::from_u64(255));
        assert!(Scalar::parse("").is_err());
        assert!(Scalar::parse("12a").is_err());
    }

    #[test]
    fn test_domain_is_enforced() {
        let max = Scalar::max_value();
        assert_eq!(max.bit_len(), 256);
        assert!(max.checked_add(&BigUint::one()).is_none());
        assert!(Scalar::zero().checked_sub(&BigUint::one()).is_none());

        let too_big = format!("0x1{}", "0".repeat(64));
        assert!(Scalar::parse(&too_big).is_err());
    }

    #[test]
    fn test_fixed_width_bytes() {
        let bytes = Scalar::from_u64(0x0102).to_be_bytes();
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
        assert!(bytes[..30].iter().all(|b| *b == 0));
        assert_eq!(Scalar::from_be_bytes(&bytes).unwrap(), Scalar::from_u64(0x0102));
    }

    #[test]
    fn test_shift_past_width_is_zero() {
        assert!(Scalar::max_value().shr(256).is_zero());
        assert_eq!(Scalar::from_u64(13).align_down(2), Scalar::from_u64(12));
    }
}
