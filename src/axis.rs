// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Axis Proof Engine.
//!
//! A proof for one axis commits `old` and `new` to the same node of the Cantor
//! tree: their lowest common ancestor at height `h = compute_lca_height(old, new)`.
//! Only the two leaf-to-LCA paths are carried, as `(height, digest)` steps.
//! Building or verifying costs `Θ(2^h)` pairings because each sibling digest
//! commits to every value in its range.

use crate::cantor::{cantor_pair, one_hash, subtree_root};
use crate::error::{KernelError, Result};
use crate::types::{Digest, Scalar};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

/// One level of a leaf-to-LCA path: the digest of the sibling subtree at `height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub height: u32,
    pub digest: Digest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisProof {
    pub old: Scalar,
    pub new: Scalar,
    /// LCA height.
    pub height: u32,
    /// `old >> height`, shared with `new`.
    pub prefix: Scalar,
    pub old_root: Digest,
    pub new_root: Digest,
    /// Leaf upward, `height` steps. The last step is the digest of the half holding `new`.
    pub old_path: Vec<PathStep>,
    /// Leaf upward, `height` steps. The last step is the digest of the half holding `old`.
    pub new_path: Vec<PathStep>,
}

/// Position of the highest differing bit plus one; zero when equal.
pub fn compute_lca_height(old: &Scalar, new: &Scalar) -> u32 {
    old.xor(new).bit_len()
}

/// Fails with `CostExceeded` (no axis named) when the LCA sits above `ceiling`.
pub fn build_axis_proof(old: &Scalar, new: &Scalar, ceiling: u32) -> Result<AxisProof> {
    let height = compute_lca_height(old, new);
    if height > ceiling {
        return Err(KernelError::CostExceeded { ceiling, height, axes: Vec::new() });
    }
    Ok(prove_axis(old, new).0)
}

/// Pure predicate; any inconsistency yields `false`.
pub fn verify_axis_proof(proof: &AxisProof) -> bool {
    axis_root(proof).is_some()
}

/// Verifies `proof` and returns the Cantor value of its LCA node.
pub fn axis_root(proof: &AxisProof) -> Option<BigUint> {
    let h = compute_lca_height(&proof.old, &proof.new);
    if proof.height != h {
        return None;
    }
    if proof.old.shr(h) != proof.prefix || proof.new.shr(h) != proof.prefix {
        return None;
    }
    if proof.old_path.len() != h as usize || proof.new_path.len() != h as usize {
        return None;
    }

    let root = if h == 0 {
        proof.old.to_biguint()
    } else {
        let old_half = climb(proof.old.as_biguint(), h - 1);
        let new_half = climb(proof.new.as_biguint(), h - 1);
        if !path_matches(&proof.old_path, &old_half, &new_half.root)
            || !path_matches(&proof.new_path, &new_half, &old_half.root)
        {
            return None;
        }
        join_halves(proof.old.as_biguint(), h, old_half.root, new_half.root)
    };

    let digest = one_hash(&root);
    if digest != proof.old_root || digest != proof.new_root {
        return None;
    }
    Some(root)
}

/// Builds the proof without a ceiling check and hands back the LCA value too.
pub(crate) fn prove_axis(old: &Scalar, new: &Scalar) -> (AxisProof, BigUint) {
    let height = compute_lca_height(old, new);

    let (root, old_path, new_path) = if height == 0 {
        (old.to_biguint(), Vec::new(), Vec::new())
    } else {
        let old_half = climb(old.as_biguint(), height - 1);
        let new_half = climb(new.as_biguint(), height - 1);
        let old_path = path_steps(&old_half, &new_half.root);
        let new_path = path_steps(&new_half, &old_half.root);
        let root = join_halves(old.as_biguint(), height, old_half.root, new_half.root);
        (root, old_path, new_path)
    };

    let digest = one_hash(&root);
    let proof = AxisProof {
        old: old.clone(),
        new: new.clone(),
        height,
        prefix: old.shr(height),
        old_root: digest,
        new_root: digest,
        old_path,
        new_path,
    };
    (proof, root)
}

/// A leaf folded up to the root of its height-`top` subtree.
struct Climb {
    root: BigUint,
    /// Sibling subtree values at heights `0..top`.
    siblings: Vec<BigUint>,
}

fn climb(leaf: &BigUint, top: u32) -> Climb {
    let one = BigUint::one();
    let mut node = leaf.clone();
    let mut siblings = Vec::with_capacity(top as usize);
    for i in 0..top {
        let shifted = leaf >> i as usize;
        let sibling_base = (&shifted ^ &one) << i as usize;
        let sibling = subtree_root(&sibling_base, i);
        node = if (&shifted & &one).is_zero() {
            cantor_pair(&node, &sibling)
        } else {
            cantor_pair(&sibling, &node)
        };
        siblings.push(sibling);
    }
    Climb { root: node, siblings }
}

fn path_steps(half: &Climb, other_half: &BigUint) -> Vec<PathStep> {
    let mut steps: Vec<PathStep> = half
        .siblings
        .iter()
        .enumerate()
        .map(|(i, sibling)| PathStep { height: i as u32, digest: one_hash(sibling) })
        .collect();
    steps.push(PathStep { height: steps.len() as u32, digest: one_hash(other_half) });
    steps
}

fn path_matches(path: &[PathStep], half: &Climb, other_half: &BigUint) -> bool {
    let expected = path_steps(half, other_half);
    expected.len() == path.len() && expected.iter().zip(path).all(|(a, b)| a == b)
}

/// Orders the two halves under the LCA by bit `h - 1` of `old`.
fn join_halves(old: &BigUint, h: u32, old_half: BigUint, new_half: BigUint) -> BigUint {
    let old_is_left = ((old >> (h - 1) as usize) & BigUint::one()).is_zero();
    if old_is_left {
        cantor_pair(&old_half, &new_half)
    } else {
        cantor_pair(&new_half, &old_half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step_proof_shape() {
        let (proof, root) = prove_axis(&Scalar::from_u64(100), &Scalar::from_u64(101));
        assert_eq!(proof.height, 1);
        assert_eq!(root, BigUint::from(20402u32));
        assert_eq!(proof.old_path.len(), 1);
        assert_eq!(proof.old_path[0].digest, one_hash(&BigUint::from(101u32)));
        assert_eq!(proof.new_path[0].digest, one_hash(&BigUint::from(100u32)));
        assert!(verify_axis_proof(&proof));
    }

    #[test]
    fn test_zero_height_proof_is_the_leaf() {
        let p = build_axis_proof(&Scalar::from_u64(200), &Scalar::from_u64(200), 0).unwrap();
        assert_eq!(p.height, 0);
        assert!(p.old_path.is_empty());
        assert_eq!(axis_root(&p), Some(BigUint::from(200u32)));
    }
}
