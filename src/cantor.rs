// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Cantor pairing tree and the SHA-256 digest forms built on it.
//!
//! A node at height `h` covering `[base, base + 2^h)` has the value
//! `pair(left, right)` of its two children; a leaf's value is the axis value
//! itself. Every node therefore commits to each value in its range, which is
//! what makes folding a subtree cost `2^h` pairings.

use crate::error::{KernelError, Result};
use crate::types::Digest;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// `(a + b)(a + b + 1) / 2 + b`
pub fn cantor_pair(a: &BigUint, b: &BigUint) -> BigUint {
    let s = a + b;
    let tri = (&s * (&s + 1u32)) >> 1usize;
    tri + b
}

/// Minimal big-endian bytes; zero encodes as a single `0x00`.
pub fn int_to_bytes_be_min(n: &BigUint) -> Vec<u8> {
    if n.is_zero() {
        return vec![0];
    }
    n.to_bytes_be()
}

/// Internal content hash of a node value.
pub fn one_hash(n: &BigUint) -> Digest {
    Digest::sha256(&int_to_bytes_be_min(n))
}

/// External commitment id derived from a 1-hash.
pub fn two_hash(d: &Digest) -> Digest {
    Digest::sha256(d.as_bytes())
}

/// Root value of the aligned subtree of height `h` that starts at `base`.
///
/// `base` is aligned down to a multiple of `2^h` first. Leaves are folded
/// left to right with a merge stack, so memory stays at `O(h)` values.
pub fn subtree_root(base: &BigUint, h: u32) -> BigUint {
    let start = (base >> h as usize) << h as usize;
    let end = &start + (BigUint::one() << h as usize);

    let mut stack: Vec<(u32, BigUint)> = Vec::with_capacity(h as usize + 1);
    let mut leaf = start;
    while leaf < end {
        let mut level = 0u32;
        let mut value = leaf.clone();
        while matches!(stack.last(), Some((top, _)) if *top == level) {
            if let Some((_, left)) = stack.pop() {
                value = cantor_pair(&left, &value);
                level += 1;
            }
        }
        stack.push((level, value));
        leaf += 1u32;
    }
    stack.pop().map(|(_, v)| v).unwrap_or_default()
}

/// Every level of the subtree of height `h` containing `base`, leaves first.
/// Refuses heights above `max_height` since the listing holds `2^(h+1) - 1` values.
pub fn subtree_levels(base: &BigUint, h: u32, max_height: u32) -> Result<Vec<Vec<BigUint>>> {
    if h > max_height {
        return Err(KernelError::TreeTooTall { height: h, limit: max_height });
    }
    let start = (base >> h as usize) << h as usize;
    let width = 1usize << h;

    let mut levels = Vec::with_capacity(h as usize + 1);
    let mut current: Vec<BigUint> = (0..width).map(|i| &start + BigUint::from(i)).collect();
    while current.len() > 1 {
        let next = current
            .chunks(2)
            .map(|pair| cantor_pair(&pair[0], &pair[1]))
            .collect();
        levels.push(current);
        current = next;
    }
    levels.push(current);
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_pairing_values() {
        assert_eq!(cantor_pair(&big(0), &big(0)), big(0));
        assert_eq!(cantor_pair(&big(0), &big(1)), big(2));
        assert_eq!(cantor_pair(&big(2), &big(3)), big(18));
        assert_eq!(cantor_pair(&big(100), &big(101)), big(20402));
    }

    #[test]
    fn test_subtree_root_matches_levels() {
        assert_eq!(subtree_root(&big(0), 2), big(228));
        assert_eq!(subtree_root(&big(3), 2), big(228));
        assert_eq!(subtree_root(&big(7), 0), big(7));
        for h in 0..=5 {
            let levels = subtree_levels(&big(32), h, 8).unwrap();
            assert_eq!(levels.len(), h as usize + 1);
            assert_eq!(levels[h as usize], vec![subtree_root(&big(32), h)]);
        }
    }

    #[test]
    fn test_levels_respect_limit() {
        assert_eq!(
            subtree_levels(&big(0), 9, 8),
            Err(KernelError::TreeTooTall { height: 9, limit: 8 })
        );
    }

    #[test]
    fn test_minimal_bytes() {
        assert_eq!(int_to_bytes_be_min(&big(0)), vec![0]);
        assert_eq!(int_to_bytes_be_min(&big(256)), vec![1, 0]);
        assert_eq!(two_hash(&one_hash(&big(1))), Digest::sha256(one_hash(&big(1)).as_bytes()));
    }
}
