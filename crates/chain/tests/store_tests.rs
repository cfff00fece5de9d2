// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use cyberspace_chain::log::append_record;
use cyberspace_chain::{ChainError, ChainReceipt, ChainStore};
use cyberspace_kernel::event::{Event, EventBody, PublicKey};
use cyberspace_kernel::movement::build_movement_proof;
use cyberspace_kernel::replay::ChainFault;
use cyberspace_kernel::{Coordinate, Delta};
use std::fs;
use tempfile::TempDir;

const AUTHOR: PublicKey = PublicKey([4u8; 32]);

fn setup() -> (TempDir, ChainStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ChainStore::open(dir.path().join("chains")).unwrap();
    (dir, store)
}

fn step(store: &ChainStore, label: &str, to: Coordinate) -> Event {
    let from = store.tip(label).unwrap().coordinate().clone();
    let proof = build_movement_proof(&from, &to, 8).unwrap();
    store.append_hop(label, proof, &to, AUTHOR).unwrap()
}

#[test]
fn test_create_is_once_per_label() {
    let (_dir, store) = setup();
    let genesis = store.create_chain("main", AUTHOR, Coordinate::from_u64(1, 2, 3)).unwrap();
    assert!(genesis.is_genesis());
    assert!(matches!(
        store.create_chain("main", AUTHOR, Coordinate::origin()),
        Err(ChainError::ChainExists(label)) if label == "main"
    ));
    assert_eq!(store.tip("main").unwrap(), genesis);
    assert_eq!(store.genesis("main").unwrap(), genesis);
}

#[test]
fn test_missing_and_empty_chains() {
    let (_dir, store) = setup();
    let proof = build_movement_proof(&Coordinate::origin(), &Coordinate::from_u64(1, 0, 0), 8).unwrap();
    assert!(matches!(
        store.append_hop("ghost", proof, &Coordinate::from_u64(1, 0, 0), AUTHOR),
        Err(ChainError::NoSuchChain(_))
    ));

    fs::write(store.chain_path("hollow").unwrap(), b"").unwrap();
    assert!(matches!(store.tip("hollow"), Err(ChainError::EmptyChain(_))));

    fs::write(store.chain_path("my chain").unwrap(), b"").unwrap();
    assert!(matches!(store.tip(" my chain "), Err(ChainError::EmptyChain(label)) if label == "my_chain"));
    assert!(matches!(store.genesis("my chain"), Err(ChainError::EmptyChain(label)) if label == "my_chain"));
    assert!(matches!(store.replay_all("my chain"), Err(ChainError::EmptyChain(label)) if label == "my_chain"));
}

#[test]
fn test_append_rejects_mismatched_proofs() {
    let (_dir, store) = setup();
    store.create_chain("main", AUTHOR, Coordinate::origin()).unwrap();

    let elsewhere = build_movement_proof(&Coordinate::from_u64(5, 0, 0), &Coordinate::from_u64(6, 0, 0), 8).unwrap();
    assert!(matches!(
        store.append_hop("main", elsewhere, &Coordinate::from_u64(6, 0, 0), AUTHOR),
        Err(ChainError::ProofMismatch(_))
    ));

    let proof = build_movement_proof(&Coordinate::origin(), &Coordinate::from_u64(1, 0, 0), 8).unwrap();
    assert!(matches!(
        store.append_hop("main", proof, &Coordinate::from_u64(2, 0, 0), AUTHOR),
        Err(ChainError::ProofMismatch(_))
    ));
    assert_eq!(store.length("main").unwrap(), 1);
}

#[test]
fn test_replay_reproduces_append_sequence() {
    let (_dir, store) = setup();
    store.create_chain("main", AUTHOR, Coordinate::origin()).unwrap();
    let path = [
        Coordinate::from_u64(3, 2, 1),
        Coordinate::from_u64(3, 9, 1),
        Coordinate::from_u64(100, 9, 0),
        Coordinate::from_u64(101, 9, 0),
    ];
    let mut seen = vec![Coordinate::origin()];
    for to in &path {
        seen.push(step(&store, "main", to.clone()).coordinate().clone());
    }

    let (events, last) = store.replay_all("main").unwrap();
    let replayed: Vec<Coordinate> = events.iter().map(|e| e.coordinate().clone()).collect();
    assert_eq!(replayed, seen);
    assert_eq!(last, Coordinate::from_u64(101, 9, 0));

    let mut replay = store.replay("main").unwrap();
    assert_eq!(replay.by_ref().count(), 5);
    assert_eq!(replay.coordinate(), Some(&last));
    replay.rewind().unwrap();
    assert_eq!(replay.coordinate(), None);
    let first = replay.next().unwrap().unwrap();
    assert!(first.is_genesis());
}

#[test]
fn test_tampered_record_breaks_replay() {
    let (_dir, store) = setup();
    store.create_chain("main", AUTHOR, Coordinate::origin()).unwrap();
    step(&store, "main", Coordinate::from_u64(1, 0, 0));
    step(&store, "main", Coordinate::from_u64(2, 0, 0));

    let path = store.chain_path("main").unwrap();
    let mut events = store.read_events("main").unwrap();
    if let EventBody::Hop(hop) = &mut events[1].body {
        hop.coordinate = Coordinate::from_u64(7, 0, 0);
    }
    let rewritten: String = events.iter().map(|e| serde_json::to_string(e).unwrap() + "\n").collect();
    fs::write(&path, rewritten).unwrap();

    let err = store.replay_all("main").unwrap_err();
    assert!(matches!(err, ChainError::BrokenChain { line: 2, .. }), "{err}");

    let report = store.audit("main").unwrap();
    assert!(!report.is_clean());
    assert!(report.faults.iter().all(|f| f.line >= 2));
    assert!(report.faults.iter().any(|f| matches!(f.fault, ChainFault::IdMismatch { .. })));
    assert!(report.faults.iter().any(|f| matches!(f.fault, ChainFault::ProofOrigin { .. })));
}

#[test]
fn test_fork_is_detected() {
    let (_dir, store) = setup();
    let genesis = store.create_chain("main", AUTHOR, Coordinate::origin()).unwrap();
    step(&store, "main", Coordinate::from_u64(1, 0, 0));

    // A second hop off genesis, written behind the store's back.
    let proof = build_movement_proof(&Coordinate::origin(), &Coordinate::from_u64(0, 1, 0), 8).unwrap();
    let rival = Event::hop(AUTHOR, 99, genesis.id, genesis.id, Coordinate::from_u64(0, 1, 0), proof).unwrap();
    append_record(&store.chain_path("main").unwrap(), &rival).unwrap();

    let report = store.audit("main").unwrap();
    assert!(report
        .faults
        .iter()
        .any(|f| f.line == 3 && f.fault == ChainFault::Fork { id: rival.id, prev: genesis.id }));
    assert!(matches!(store.replay_all("main"), Err(ChainError::BrokenChain { line: 3, .. })));
}

#[test]
fn test_labels_are_listed_and_normalised() {
    let (_dir, store) = setup();
    store.create_chain("beta", AUTHOR, Coordinate::origin()).unwrap();
    store.create_chain("alpha chain", AUTHOR, Coordinate::origin()).unwrap();
    assert_eq!(store.list_labels().unwrap(), vec!["alpha_chain".to_string(), "beta".to_string()]);
    assert!(store.exists("alpha chain").unwrap());
    assert!(matches!(store.create_chain("  ", AUTHOR, Coordinate::origin()), Err(ChainError::InvalidLabel(_))));
}

#[test]
fn test_concurrent_appends_stay_linear() {
    let (_dir, store) = setup();
    store.create_chain("main", AUTHOR, Coordinate::origin()).unwrap();

    std::thread::scope(|scope| {
        for axis in 0..3u64 {
            let store = &store;
            scope.spawn(move || {
                let mut appended = 0;
                while appended < 4 {
                    let from = store.tip("main").unwrap().coordinate().clone();
                    let delta = match axis {
                        0 => Delta::from_i64(1, 0, 0),
                        1 => Delta::from_i64(0, 1, 0),
                        _ => Delta::from_i64(0, 0, 1),
                    };
                    let to = from.checked_add(&delta).unwrap();
                    let proof = build_movement_proof(&from, &to, 8).unwrap();
                    match store.append_hop("main", proof, &to, AUTHOR) {
                        Ok(_) => appended += 1,
                        Err(ChainError::ProofMismatch(_)) => continue,
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
            });
        }
    });

    assert_eq!(store.length("main").unwrap(), 13);
    assert!(store.audit("main").unwrap().is_clean());
    assert_eq!(store.replay_all("main").unwrap().1, Coordinate::from_u64(4, 4, 4));
}

#[test]
fn test_receipt_tracks_history() {
    let (_dir, store) = setup();
    store.create_chain("main", AUTHOR, Coordinate::origin()).unwrap();
    step(&store, "main", Coordinate::from_u64(1, 1, 1));

    let first = ChainReceipt::issue(&store, "main").unwrap();
    assert_eq!(first.event_count, 2);
    assert_eq!(first.coordinate, Coordinate::from_u64(1, 1, 1));
    assert!(first.matches(&ChainReceipt::issue(&store, "main").unwrap()));

    step(&store, "main", Coordinate::from_u64(2, 1, 1));
    let second = ChainReceipt::issue(&store, "main").unwrap();
    assert!(!first.matches(&second));
    assert_eq!(second.genesis, first.genesis);
}

#[test]
fn test_append_refuses_to_follow_torn_tail() {
    let (_dir, store) = setup();
    store.create_chain("main", AUTHOR, Coordinate::origin()).unwrap();
    step(&store, "main", Coordinate::from_u64(1, 0, 0));

    let path = store.chain_path("main").unwrap();
    let mut raw = fs::read(&path).unwrap();
    raw.extend_from_slice(br#"{"id":"ab"#);
    fs::write(&path, &raw).unwrap();

    // Readers still see the two complete records.
    assert_eq!(store.tip("main").unwrap().coordinate(), &Coordinate::from_u64(1, 0, 0));

    let to = Coordinate::from_u64(2, 0, 0);
    let proof = build_movement_proof(&Coordinate::from_u64(1, 0, 0), &to, 8).unwrap();
    match store.append_hop("main", proof, &to, AUTHOR) {
        Err(ChainError::BrokenChain { label, line, .. }) => {
            assert_eq!(label, "main");
            assert_eq!(line, 3);
        }
        other => panic!("expected a refused append, got {other:?}"),
    }

    assert_eq!(fs::read(&path).unwrap(), raw);
    let (events, coordinate) = store.replay_all("main").unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(coordinate, Coordinate::from_u64(1, 0, 0));
}

#[test]
fn test_hops_above_verify_height_are_reported_not_verified() {
    let dir = tempfile::tempdir().unwrap();
    let store = ChainStore::open(dir.path().join("chains")).unwrap();
    store.create_chain("main", AUTHOR, Coordinate::origin()).unwrap();
    step(&store, "main", Coordinate::from_u64(1, 0, 0));
    let tall = step(&store, "main", Coordinate::from_u64(16, 0, 0));
    assert!(store.audit("main").unwrap().is_clean());

    let capped = ChainStore::open(dir.path().join("chains")).unwrap().with_verify_height(4);
    assert_eq!(capped.verify_height(), 4);
    let report = capped.audit("main").unwrap();
    assert_eq!(report.faults.len(), 1);
    assert_eq!(report.faults[0].line, 3);
    assert_eq!(report.faults[0].fault, ChainFault::ProofTooTall { id: tall.id, height: 5, limit: 4 });

    assert!(matches!(capped.replay_all("main"), Err(ChainError::BrokenChain { line: 3, .. })));
}
