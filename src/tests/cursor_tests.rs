// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::event::{Event, EventBody, PublicKey};
use crate::axis::{build_axis_proof, AxisProof, PathStep};
use crate::movement::{build_movement_proof, MovementProof};
use crate::replay::{ChainCursor, ChainFault};
use crate::types::{Coordinate, Digest, Scalar};
use num_bigint::BigUint;

const AUTHOR: PublicKey = PublicKey([1u8; 32]);

fn hop_from(prev: &Event, genesis: &Event, to: Coordinate, at: u64) -> Event {
    let proof = build_movement_proof(prev.coordinate(), &to, 8).unwrap();
    Event::hop(AUTHOR, at, prev.id, genesis.id, to, proof).unwrap()
}

/// genesis at origin, then two hops.
fn chain() -> Vec<Event> {
    let genesis = Event::genesis(AUTHOR, 100, Coordinate::origin()).unwrap();
    let first = hop_from(&genesis, &genesis, Coordinate::from_u64(3, 2, 1), 101);
    let second = hop_from(&first, &genesis, Coordinate::from_u64(4, 2, 1), 102);
    vec![genesis, first, second]
}

#[test]
fn test_clean_chain_replays_to_tip() {
    let events = chain();
    let mut cursor = ChainCursor::new();
    for e in &events {
        cursor.apply(e).unwrap();
    }
    assert_eq!(cursor.len(), 3);
    assert_eq!(cursor.tip(), Some(&events[2].id));
    assert_eq!(cursor.genesis(), Some(&events[0].id));
    assert_eq!(cursor.coordinate(), Some(&Coordinate::from_u64(4, 2, 1)));
}

#[test]
fn test_hop_before_genesis() {
    let events = chain();
    let cursor = ChainCursor::new();
    assert!(cursor.check(&events[1]).contains(&ChainFault::MissingGenesis));
}

#[test]
fn test_second_genesis() {
    let events = chain();
    let mut cursor = ChainCursor::new();
    cursor.apply(&events[0]).unwrap();
    let other = Event::genesis(AUTHOR, 200, Coordinate::origin()).unwrap();
    assert_eq!(cursor.apply(&other), Err(ChainFault::UnexpectedGenesis { id: other.id }));
}

#[test]
fn test_reordered_hop_breaks_link() {
    let events = chain();
    let mut cursor = ChainCursor::new();
    cursor.apply(&events[0]).unwrap();
    let faults = cursor.check(&events[2]);
    assert!(faults.contains(&ChainFault::BrokenLink {
        id: events[2].id,
        expected: Some(events[0].id),
        found: Some(events[1].id),
    }));
    assert!(faults.iter().any(|f| matches!(f, ChainFault::ProofOrigin { .. })));
}

#[test]
fn test_fork_is_reported() {
    let events = chain();
    let rival = hop_from(&events[0], &events[0], Coordinate::from_u64(1, 0, 0), 150);
    let mut cursor = ChainCursor::new();
    for e in &events[..2] {
        cursor.apply(e).unwrap();
    }
    let faults = cursor.check(&rival);
    assert!(faults.contains(&ChainFault::Fork { id: rival.id, prev: events[0].id }));
}

#[test]
fn test_tampered_coordinate_is_caught() {
    let mut events = chain();
    if let EventBody::Hop(hop) = &mut events[1].body {
        hop.coordinate = Coordinate::from_u64(3, 2, 0);
    }
    let mut cursor = ChainCursor::new();
    cursor.apply(&events[0]).unwrap();
    let faults = cursor.check(&events[1]);
    assert!(faults.contains(&ChainFault::IdMismatch { id: events[1].id }));
    assert!(faults.iter().any(|f| matches!(f, ChainFault::ProofTarget { .. })));
}

#[test]
fn test_foreign_author_and_genesis() {
    let events = chain();
    let stranger = PublicKey([9u8; 32]);
    let other_genesis = Event::genesis(stranger, 1, Coordinate::origin()).unwrap();
    let proof = build_movement_proof(events[0].coordinate(), &Coordinate::from_u64(1, 0, 0), 8).unwrap();
    let hop = Event::hop(stranger, 101, events[0].id, other_genesis.id, Coordinate::from_u64(1, 0, 0), proof).unwrap();

    let mut cursor = ChainCursor::new();
    cursor.apply(&events[0]).unwrap();
    let faults = cursor.check(&hop);
    assert!(faults.contains(&ChainFault::AuthorMismatch { id: hop.id }));
    assert!(faults.contains(&ChainFault::GenesisMismatch {
        id: hop.id,
        expected: events[0].id,
        found: other_genesis.id,
    }));
}

#[test]
fn test_audit_continues_after_advance() {
    let events = chain();
    let mut cursor = ChainCursor::new();
    let mut all = Vec::new();
    // Skip the first hop; the second no longer links.
    for e in [&events[0], &events[2]] {
        all.extend(cursor.check(e));
        cursor.advance(e);
    }
    assert!(!all.is_empty());
    assert_eq!(cursor.len(), 2);
    assert_eq!(cursor.coordinate(), Some(events[2].coordinate()));
}

#[test]
fn test_tall_hop_is_not_verified() {
    let genesis = Event::genesis(AUTHOR, 100, Coordinate::origin()).unwrap();
    let far = Scalar::from_biguint(BigUint::from(1u8) << 199usize).unwrap();
    let filler: Vec<PathStep> = (0..200).map(|height| PathStep { height, digest: Digest([0u8; 32]) }).collect();
    let x = AxisProof {
        old: Scalar::zero(),
        new: far.clone(),
        height: 200,
        prefix: Scalar::zero(),
        old_root: Digest([0u8; 32]),
        new_root: Digest([0u8; 32]),
        old_path: filler.clone(),
        new_path: filler,
    };
    let flat = build_axis_proof(&Scalar::zero(), &Scalar::zero(), 0).unwrap();
    let proof = MovementProof { x, y: flat.clone(), z: flat, proof_hash: Digest([0u8; 32]) };
    let to = Coordinate::new(far, Scalar::zero(), Scalar::zero());
    let hop = Event::hop(AUTHOR, 101, genesis.id, genesis.id, to, proof).unwrap();

    let mut cursor = ChainCursor::new();
    cursor.apply(&genesis).unwrap();
    assert_eq!(cursor.check(&hop), vec![ChainFault::ProofTooTall { id: hop.id, height: 200, limit: 20 }]);
}

#[test]
fn test_height_limit_gates_verification() {
    let events = chain();
    // The first hop, (0,0,0) -> (3,2,1), has LCA height 2.
    let mut strict = ChainCursor::with_height_limit(1);
    strict.apply(&events[0]).unwrap();
    assert_eq!(strict.check(&events[1]), vec![ChainFault::ProofTooTall { id: events[1].id, height: 2, limit: 1 }]);

    let mut exact = ChainCursor::with_height_limit(2);
    exact.apply(&events[0]).unwrap();
    assert!(exact.check(&events[1]).is_empty());
}
