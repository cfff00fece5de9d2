// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Published vectors, asserted bit for bit.
use crate::axis::axis_root;
use crate::cantor::{one_hash, subtree_root};
use crate::movement::{build_movement_proof, combine_roots, estimate_cost, verify_movement_proof, HopCost};
use crate::types::Coordinate;
use num_bigint::BigUint;

fn roots(from: &Coordinate, to: &Coordinate) -> [BigUint; 3] {
    let proof = build_movement_proof(from, to, 16).unwrap();
    [
        axis_root(&proof.x).unwrap(),
        axis_root(&proof.y).unwrap(),
        axis_root(&proof.z).unwrap(),
    ]
}

#[test]
fn test_subtree_root_vector() {
    assert_eq!(subtree_root(&BigUint::from(0u32), 2), BigUint::from(228u32));
}

#[test]
fn test_origin_to_321() {
    let from = Coordinate::origin();
    let to = Coordinate::from_u64(3, 2, 1);

    let [cx, cy, cz] = roots(&from, &to);
    assert_eq!(cx, BigUint::from(228u32));
    assert_eq!(cy, BigUint::from(228u32));
    assert_eq!(cz, BigUint::from(2u32));
    let combined = combine_roots(&cx, &cy, &cz);
    assert_eq!(combined, BigUint::from(5_452_446_953u64));

    let proof = build_movement_proof(&from, &to, 16).unwrap();
    assert_eq!(proof.proof_hash, one_hash(&combined));
    assert_eq!(
        proof.proof_hash.to_hex(),
        "9306cfcf163adfa9a1f34933091a445bbbc77de02a1e504eba9d6bcd5950b414"
    );
    assert_eq!(
        proof.discovery_id().to_hex(),
        "1247b1caeb69145100d6adbb52943c36d72023b10a0f5f434d41311d0b0b339c"
    );
    assert!(verify_movement_proof(&proof));
}

#[test]
fn test_unit_step_on_x() {
    let from = Coordinate::from_u64(100, 200, 300);
    let to = Coordinate::from_u64(101, 200, 300);

    assert_eq!(estimate_cost(&from, &to), HopCost { x: 1, y: 0, z: 0 });
    let [cx, cy, cz] = roots(&from, &to);
    assert_eq!(cx, BigUint::from(20402u32));
    assert_eq!(cy, BigUint::from(200u32));
    assert_eq!(cz, BigUint::from(300u32));

    let proof = build_movement_proof(&from, &to, 16).unwrap();
    assert_eq!(
        proof.proof_hash.to_hex(),
        "4e02171a1986de2299e3abe37a00b419d853da9bcab7139d76189f5506b138f6"
    );
    assert_eq!(
        proof.discovery_id().to_hex(),
        "b3e3141659d48d3f7e39a684ab9f193badc11497ea6c3d0f89fefd8e9dbc85c5"
    );
}

#[test]
fn test_origin_to_800_900_1000() {
    let proof = build_movement_proof(&Coordinate::origin(), &Coordinate::from_u64(800, 900, 1000), 16).unwrap();
    assert_eq!(proof.cost(), HopCost { x: 10, y: 10, z: 10 });
    assert_eq!(
        proof.proof_hash.to_hex(),
        "d1ed6818770b37a3d68c97fd65cd07d3af24a705ef8eb681fea99172b8eadf0d"
    );
    assert_eq!(
        proof.discovery_id().to_hex(),
        "7b67be1e49962882683bc3b3a1be728136754c9fbe9b9a75c4a3e2a629c2d97a"
    );
    assert!(verify_movement_proof(&proof));
}
