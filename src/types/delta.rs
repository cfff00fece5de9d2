// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Signed displacements.

use crate::error::{KernelError, Result};
use num_bigint::BigUint;
use num_traits::{Num, Zero};
use std::fmt;

/// Signed magnitude offset along one axis. Zero is never negative.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AxisDelta {
    negative: bool,
    magnitude: BigUint,
}

impl AxisDelta {
    pub fn new(negative: bool, magnitude: BigUint) -> Self {
        let negative = negative && !magnitude.is_zero();
        Self { negative, magnitude }
    }

    pub fn from_i64(v: i64) -> Self {
        Self::new(v < 0, BigUint::from(v.unsigned_abs()))
    }

    /// Accepts `[+|-]digits` in decimal, or hex after `0x`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let body = body.trim();
        let (digits, radix) = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
            Some(rest) => (rest, 16),
            None => (body, 10),
        };
        if digits.is_empty() {
            return Err(KernelError::Parse(format!("empty delta component {s:?}")));
        }
        let magnitude = BigUint::from_str_radix(digits, radix)
            .map_err(|e| KernelError::Parse(format!("invalid delta component {s:?}: {e}")))?;
        Ok(Self::new(negative, magnitude))
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude(&self) -> &BigUint {
        &self.magnitude
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }
}

impl fmt::Display for AxisDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

/// Component-wise displacement `(dx, dy, dz)`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Delta {
    pub x: AxisDelta,
    pub y: AxisDelta,
    pub z: AxisDelta,
}

impl Delta {
    pub fn new(x: AxisDelta, y: AxisDelta, z: AxisDelta) -> Self {
        Self { x, y, z }
    }

    pub fn from_i64(x: i64, y: i64, z: i64) -> Self {
        Self::new(AxisDelta::from_i64(x), AxisDelta::from_i64(y), AxisDelta::from_i64(z))
    }

    /// Parses `dx,dy,dz`. Whitespace around components is ignored.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
        if parts.len() != 3 {
            return Err(KernelError::Parse(format!(
                "expected dx,dy,dz but got {} component(s)",
                parts.len()
            )));
        }
        Ok(Self::new(
            AxisDelta::parse(parts[0])?,
            AxisDelta::parse(parts[1])?,
            AxisDelta::parse(parts[2])?,
        ))
    }

    pub fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}
