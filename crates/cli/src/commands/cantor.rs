// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Prints the Cantor subtrees behind a movement proof.

use anyhow::Context;
use cyberspace_kernel::axis::compute_lca_height;
use cyberspace_kernel::cantor::{one_hash, subtree_levels, subtree_root, two_hash};
use cyberspace_kernel::movement::{build_movement_proof, combine_roots};
use cyberspace_kernel::{Axis, Coordinate};
use num_bigint::BigUint;

/// `max_height` bounds the level listing; `max_compute_height` bounds the proof itself.
pub fn run(from: &str, to: &str, max_height: u32, max_compute_height: u32) -> anyhow::Result<()> {
    let from = Coordinate::parse(from).with_context(|| format!("parsing --from {from:?}"))?;
    let to = Coordinate::parse(to).with_context(|| format!("parsing --to {to:?}"))?;
    let proof = build_movement_proof(&from, &to, max_compute_height)?;

    println!("from: {from}");
    println!("to:   {to}");

    let mut roots: Vec<BigUint> = Vec::with_capacity(3);
    for axis in Axis::ALL {
        let (old, new) = (from.axis(axis), to.axis(axis));
        let height = compute_lca_height(old, new);
        let base = old.align_down(height);
        let last = base.as_biguint() + ((BigUint::from(1u8) << height as usize) - 1u8);
        let root = subtree_root(base.as_biguint(), height);

        println!();
        println!("axis {axis}: {old} -> {new}");
        println!("  lca_height: {height}");
        println!("  range:      [{base}, {last}]");
        if height <= max_height {
            let levels = subtree_levels(base.as_biguint(), height, max_height)?;
            for (level, values) in levels.iter().enumerate() {
                let row: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                println!("  level {level}: {}", row.join(" "));
            }
        } else {
            println!("  (levels omitted: height {height} exceeds --max-height {max_height})");
        }
        println!("  root:       {root}");
        println!("  root_hex:   {}", root.to_str_radix(16));
        roots.push(root);
    }

    let combined = combine_roots(&roots[0], &roots[1], &roots[2]);
    let hash1 = one_hash(&combined);
    println!();
    println!("combined: {combined}");
    println!("1-hash:   {hash1}");
    println!("2-hash:   {}", two_hash(&hash1));
    if hash1 != proof.proof_hash {
        anyhow::bail!("recomputed 1-hash disagrees with the built proof ({})", proof.proof_hash);
    }
    Ok(())
}
