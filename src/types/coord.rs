// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Absolute positions and their two boundary encodings.
//!
//! # Encodings
//! - Comma form: `x,y,z` in decimal (components may also be `0x` hex on input).
//! - Hex form: the three axes as fixed 32-byte big-endian words, concatenated
//!   `x || y || z` and rendered as `0x` + 192 hex digits. On input the `0x` and
//!   any leading zeros are optional.
//!
//! Both forms parse back to the identical `Coordinate`.

use crate::config::{AXIS_BYTES, INTERLEAVED_AXIS_BITS};
use crate::error::{KernelError, Result};
use crate::types::delta::Delta;
use crate::types::scalar::Scalar;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

const PACKED_BYTES: usize = AXIS_BYTES * 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: Scalar,
    pub y: Scalar,
    pub z: Scalar,
}

impl Coordinate {
    pub fn new(x: Scalar, y: Scalar, z: Scalar) -> Self {
        Self { x, y, z }
    }

    pub fn from_u64(x: u64, y: u64, z: u64) -> Self {
        Self::new(Scalar::from_u64(x), Scalar::from_u64(y), Scalar::from_u64(z))
    }

    pub fn origin() -> Self {
        Self::default()
    }

    pub fn axis(&self, axis: Axis) -> &Scalar {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// `self + delta`, rejecting any component that leaves the 256-bit domain.
    pub fn checked_add(&self, delta: &Delta) -> Result<Coordinate> {
        let x = self.x.checked_offset(&delta.x).ok_or(KernelError::OutOfDomain { axis: Axis::X })?;
        let y = self.y.checked_offset(&delta.y).ok_or(KernelError::OutOfDomain { axis: Axis::Y })?;
        let z = self.z.checked_offset(&delta.z).ok_or(KernelError::OutOfDomain { axis: Axis::Z })?;
        Ok(Coordinate::new(x, y, z))
    }

    /// Displacement that takes `self` to `target`.
    pub fn delta_to(&self, target: &Coordinate) -> Delta {
        Delta::new(
            self.x.delta_to(&target.x),
            self.y.delta_to(&target.y),
            self.z.delta_to(&target.z),
        )
    }

    pub fn render_comma(&self) -> String {
        format!("{},{},{}", self.x, self.y, self.z)
    }

    pub fn render_hex(&self) -> String {
        let mut packed = Vec::with_capacity(PACKED_BYTES);
        packed.extend_from_slice(&self.x.to_be_bytes());
        packed.extend_from_slice(&self.y.to_be_bytes());
        packed.extend_from_slice(&self.z.to_be_bytes());
        format!("0x{}", hex::encode(packed))
    }

    /// Accepts either boundary encoding. A comma selects the comma form.
    pub fn parse(s: &str) -> Result<Coordinate> {
        let s = s.trim();
        if s.contains(',') {
            Self::parse_comma(s)
        } else {
            Self::parse_hex(s)
        }
    }

    fn parse_comma(s: &str) -> Result<Coordinate> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(KernelError::Parse(format!(
                "expected x,y,z but got {} component(s)",
                parts.len()
            )));
        }
        Ok(Coordinate::new(
            Scalar::parse(parts[0])?,
            Scalar::parse(parts[1])?,
            Scalar::parse(parts[2])?,
        ))
    }

    fn parse_hex(s: &str) -> Result<Coordinate> {
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        if digits.is_empty() {
            return Err(KernelError::Parse("empty coordinate".into()));
        }
        if digits.len() > PACKED_BYTES * 2 {
            return Err(KernelError::Parse(format!(
                "coordinate hex longer than {} digits",
                PACKED_BYTES * 2
            )));
        }
        let padded = format!("{:0>width$}", digits, width = PACKED_BYTES * 2);
        let bytes = hex::decode(&padded).map_err(|e| KernelError::Parse(format!("invalid coordinate hex: {e}")))?;
        Ok(Coordinate::new(
            Scalar::from_be_bytes(&bytes[..AXIS_BYTES])?,
            Scalar::from_be_bytes(&bytes[AXIS_BYTES..AXIS_BYTES * 2])?,
            Scalar::from_be_bytes(&bytes[AXIS_BYTES * 2..])?,
        ))
    }

    /// De-interleaves a 256-bit key into three 85-bit axes.
    ///
    /// Bit 0 is the plane bit and is ignored. For axis bit `i`:
    /// z comes from key bit `1 + 3i`, y from `2 + 3i`, x from `3 + 3i`.
    pub fn from_interleaved(key: &[u8; 32]) -> Coordinate {
        let bit = |pos: u32| -> u128 {
            let byte = key[31 - (pos / 8) as usize];
            ((byte >> (pos % 8)) & 1) as u128
        };
        let (mut x, mut y, mut z) = (0u128, 0u128, 0u128);
        for i in 0..INTERLEAVED_AXIS_BITS {
            z |= bit(1 + i * 3) << i;
            y |= bit(2 + i * 3) << i;
            x |= bit(3 + i * 3) << i;
        }
        Coordinate::new(
            Scalar(BigUint::from(x)),
            Scalar(BigUint::from(y)),
            Scalar(BigUint::from(z)),
        )
    }

    /// Inverse of [`Coordinate::from_interleaved`] with the plane bit clear.
    /// `None` when any axis does not fit in 85 bits.
    pub fn to_interleaved(&self) -> Option<[u8; 32]> {
        let limit = 1u128 << INTERLEAVED_AXIS_BITS;
        let x = self.x.as_biguint().to_u128().filter(|v| *v < limit)?;
        let y = self.y.as_biguint().to_u128().filter(|v| *v < limit)?;
        let z = self.z.as_biguint().to_u128().filter(|v| *v < limit)?;

        let mut key = [0u8; 32];
        let mut set = |pos: u32, on: bool| {
            if on {
                key[31 - (pos / 8) as usize] |= 1 << (pos % 8);
            }
        };
        for i in 0..INTERLEAVED_AXIS_BITS {
            set(1 + i * 3, (z >> i) & 1 == 1);
            set(2 + i * 3, (y >> i) & 1 == 1);
            set(3 + i * 3, (x >> i) & 1 == 1);
        }
        Some(key)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
