// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::axis::{build_axis_proof, verify_axis_proof, AxisProof, PathStep};
use crate::movement::{build_movement_proof, verify_movement_proof};
use crate::types::{Coordinate, Digest, Scalar};

fn proof(old: u64, new: u64) -> AxisProof {
    build_axis_proof(&Scalar::from_u64(old), &Scalar::from_u64(new), 8).unwrap()
}

fn flip(d: &Digest) -> Digest {
    let mut bytes = d.0;
    bytes[0] ^= 1;
    Digest(bytes)
}

#[test]
fn test_valid_proofs_verify() {
    for (old, new) in [(0, 0), (0, 1), (1, 0), (5, 9), (9, 5), (200, 255), (37, 36), (128, 127)] {
        assert!(verify_axis_proof(&proof(old, new)), "{old} -> {new}");
    }
}

#[test]
fn test_every_single_field_mutation_is_rejected() {
    let valid = proof(5, 9);
    assert_eq!(valid.height, 4);

    let mut mutants: Vec<(&str, AxisProof)> = Vec::new();

    let mut p = valid.clone();
    p.old = Scalar::from_u64(6);
    mutants.push(("old", p));

    let mut p = valid.clone();
    p.new = Scalar::from_u64(10);
    mutants.push(("new", p));

    let mut p = valid.clone();
    p.height = 5;
    mutants.push(("height", p));

    let mut p = valid.clone();
    p.prefix = Scalar::from_u64(1);
    mutants.push(("prefix", p));

    let mut p = valid.clone();
    p.old_root = flip(&p.old_root);
    mutants.push(("old_root", p));

    let mut p = valid.clone();
    p.new_root = flip(&p.new_root);
    mutants.push(("new_root", p));

    for i in 0..valid.old_path.len() {
        let mut p = valid.clone();
        p.old_path[i].digest = flip(&p.old_path[i].digest);
        mutants.push(("old_path digest", p));

        let mut p = valid.clone();
        p.new_path[i].digest = flip(&p.new_path[i].digest);
        mutants.push(("new_path digest", p));

        let mut p = valid.clone();
        p.old_path[i].height += 1;
        mutants.push(("old_path height", p));
    }

    let mut p = valid.clone();
    p.old_path.pop();
    mutants.push(("truncated path", p));

    let mut p = valid.clone();
    p.new_path.push(PathStep { height: 4, digest: Digest::default() });
    mutants.push(("extended path", p));

    let mut p = valid.clone();
    std::mem::swap(&mut p.old_path, &mut p.new_path);
    mutants.push(("swapped paths", p));

    for (field, mutant) in mutants {
        assert!(!verify_axis_proof(&mutant), "mutating {field} should be rejected");
    }
}

#[test]
fn test_movement_hash_mutation_is_rejected() {
    let from = Coordinate::from_u64(3, 4, 5);
    let to = Coordinate::from_u64(6, 4, 1);
    let valid = build_movement_proof(&from, &to, 8).unwrap();
    assert!(verify_movement_proof(&valid));

    let mut p = valid.clone();
    p.proof_hash = flip(&p.proof_hash);
    assert!(!verify_movement_proof(&p));

    let mut p = valid.clone();
    p.z = build_axis_proof(&Scalar::from_u64(5), &Scalar::from_u64(16), 8).unwrap();
    assert!(!verify_movement_proof(&p), "valid axis proof for another move");

    let mut p = valid;
    p.y.old_root = flip(&p.y.old_root);
    assert!(!verify_movement_proof(&p));
}
