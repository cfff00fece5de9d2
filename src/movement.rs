// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Movement Proof Builder: one axis proof per dimension plus the combined hash.

use crate::axis::{axis_root, compute_lca_height, prove_axis, AxisProof};
use crate::cantor::{cantor_pair, one_hash, two_hash};
use crate::error::{KernelError, Result};
use crate::types::{Axis, Coordinate, Digest};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-axis LCA heights of a prospective hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HopCost {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl HopCost {
    pub fn get(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn max(&self) -> u32 {
        self.x.max(self.y).max(self.z)
    }

    /// Axes whose height is above `ceiling`, in x, y, z order.
    pub fn offending(&self, ceiling: u32) -> Vec<(Axis, u32)> {
        Axis::ALL
            .iter()
            .map(|&axis| (axis, self.get(axis)))
            .filter(|(_, h)| *h > ceiling)
            .collect()
    }

    pub fn within(&self, ceiling: u32) -> bool {
        self.max() <= ceiling
    }
}

impl fmt::Display for HopCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={} y={} z={}", self.x, self.y, self.z)
    }
}

/// Cheap pre-check: three XORs, no pairing work.
pub fn estimate_cost(old: &Coordinate, new: &Coordinate) -> HopCost {
    HopCost {
        x: compute_lca_height(&old.x, &new.x),
        y: compute_lca_height(&old.y, &new.y),
        z: compute_lca_height(&old.z, &new.z),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementProof {
    pub x: AxisProof,
    pub y: AxisProof,
    pub z: AxisProof,
    /// 1-hash of `pair(pair(cx, cy), cz)` over the three LCA values.
    pub proof_hash: Digest,
}

impl MovementProof {
    pub fn axis(&self, axis: Axis) -> &AxisProof {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// 2-hash of `proof_hash`; the id the hop is published under.
    pub fn discovery_id(&self) -> Digest {
        two_hash(&self.proof_hash)
    }

    pub fn origin(&self) -> Coordinate {
        Coordinate::new(self.x.old.clone(), self.y.old.clone(), self.z.old.clone())
    }

    pub fn destination(&self) -> Coordinate {
        Coordinate::new(self.x.new.clone(), self.y.new.clone(), self.z.new.clone())
    }

    pub fn cost(&self) -> HopCost {
        HopCost { x: self.x.height, y: self.y.height, z: self.z.height }
    }
}

/// Combined movement value of three axis roots.
pub fn combine_roots(cx: &BigUint, cy: &BigUint, cz: &BigUint) -> BigUint {
    cantor_pair(&cantor_pair(cx, cy), cz)
}

/// All three axes are sized before any of them is built, so a rejected hop
/// costs nothing and the error names every offending axis.
pub fn build_movement_proof(old: &Coordinate, new: &Coordinate, ceiling: u32) -> Result<MovementProof> {
    let cost = estimate_cost(old, new);
    let offending = cost.offending(ceiling);
    if !offending.is_empty() {
        return Err(KernelError::CostExceeded { ceiling, height: cost.max(), axes: offending });
    }

    let (x, cx) = prove_axis(&old.x, &new.x);
    let (y, cy) = prove_axis(&old.y, &new.y);
    let (z, cz) = prove_axis(&old.z, &new.z);
    let proof_hash = one_hash(&combine_roots(&cx, &cy, &cz));
    Ok(MovementProof { x, y, z, proof_hash })
}

pub fn verify_movement_proof(proof: &MovementProof) -> bool {
    let roots = (axis_root(&proof.x), axis_root(&proof.y), axis_root(&proof.z));
    match roots {
        (Some(cx), Some(cy), Some(cz)) => one_hash(&combine_roots(&cx, &cy, &cz)) == proof.proof_hash,
        _ => false,
    }
}
