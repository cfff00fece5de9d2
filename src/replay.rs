// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Chain replay: folding events from genesis while checking every link.

use crate::event::{Event, EventBody, EventId, PublicKey};
use crate::config::DEFAULT_MAX_LCA_HEIGHT;
use crate::movement::{estimate_cost, verify_movement_proof};
use crate::types::Coordinate;
use rustc_hash::FxHashSet;
use serde::Serialize;
use thiserror::Error;

/// A single integrity failure found while replaying a chain.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "fault", rename_all = "snake_case")]
pub enum ChainFault {
    #[error("chain does not start with a genesis event")]
    MissingGenesis,

    #[error("second genesis event {id}")]
    UnexpectedGenesis { id: EventId },

    #[error("event id {id} does not match its content")]
    IdMismatch { id: EventId },

    #[error("event {id} links to {}, expected {}", show_link(.found), show_link(.expected))]
    BrokenLink { id: EventId, expected: Option<EventId>, found: Option<EventId> },

    #[error("event {id} forks the chain at {prev}")]
    Fork { id: EventId, prev: EventId },

    #[error("event {id} names genesis {found}, chain genesis is {expected}")]
    GenesisMismatch { id: EventId, expected: EventId, found: EventId },

    #[error("event {id} is authored by a different key")]
    AuthorMismatch { id: EventId },

    #[error("hop {id} starts at {found}, chain is at {expected}")]
    ProofOrigin { id: EventId, expected: Coordinate, found: Coordinate },

    #[error("hop {id} proves a move to {proved}, but records {recorded}")]
    ProofTarget { id: EventId, proved: Coordinate, recorded: Coordinate },

    #[error("hop {id} carries an invalid movement proof")]
    ProofInvalid { id: EventId },

    /// Not verified: the proof costs more than the verifier allows.
    #[error("hop {id} has LCA height {height}, above the verify limit {limit}")]
    ProofTooTall { id: EventId, height: u32, limit: u32 },
}

fn show_link(link: &Option<EventId>) -> String {
    match link {
        Some(id) => id.to_hex(),
        None => "nothing".into(),
    }
}

/// Running position of a replay.
///
/// `check` is read-only and reports every fault of one event, `apply` stops at
/// the first, and `advance` adopts an event without looking at it so an audit
/// can continue past a fault.
///
/// Proof verification costs `Θ(2^h)`, so hops taller than `height_limit` are
/// reported as `ProofTooTall` instead of being verified.
#[derive(Debug, Clone)]
pub struct ChainCursor {
    genesis: Option<EventId>,
    author: Option<PublicKey>,
    tip: Option<EventId>,
    coordinate: Option<Coordinate>,
    len: u64,
    referenced: FxHashSet<EventId>,
    height_limit: u32,
}

impl Default for ChainCursor {
    fn default() -> Self {
        Self::with_height_limit(DEFAULT_MAX_LCA_HEIGHT)
    }
}

impl ChainCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_height_limit(height_limit: u32) -> Self {
        Self {
            genesis: None,
            author: None,
            tip: None,
            coordinate: None,
            len: 0,
            referenced: FxHashSet::default(),
            height_limit,
        }
    }

    pub fn height_limit(&self) -> u32 {
        self.height_limit
    }

    pub fn genesis(&self) -> Option<&EventId> {
        self.genesis.as_ref()
    }

    pub fn author(&self) -> Option<&PublicKey> {
        self.author.as_ref()
    }

    pub fn tip(&self) -> Option<&EventId> {
        self.tip.as_ref()
    }

    /// Coordinate at the tip; `None` before genesis.
    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.coordinate.as_ref()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn check(&self, event: &Event) -> Vec<ChainFault> {
        let id = event.id;
        let mut faults = Vec::new();

        if !event.verify_id() {
            faults.push(ChainFault::IdMismatch { id });
        }

        match (&event.body, self.tip) {
            (EventBody::Genesis(_), None) => {
                if event.prev.is_some() {
                    faults.push(ChainFault::BrokenLink { id, expected: None, found: event.prev });
                }
            }
            (EventBody::Genesis(_), Some(_)) => faults.push(ChainFault::UnexpectedGenesis { id }),
            (EventBody::Hop(_), None) => faults.push(ChainFault::MissingGenesis),
            (EventBody::Hop(hop), Some(tip)) => {
                match event.prev {
                    Some(prev) if self.referenced.contains(&prev) => {
                        faults.push(ChainFault::Fork { id, prev });
                    }
                    Some(prev) if prev == tip => {}
                    found => faults.push(ChainFault::BrokenLink { id, expected: Some(tip), found }),
                }

                if let Some(genesis) = self.genesis {
                    if hop.genesis != genesis {
                        faults.push(ChainFault::GenesisMismatch { id, expected: genesis, found: hop.genesis });
                    }
                }
                if self.author.is_some_and(|author| author != event.pubkey) {
                    faults.push(ChainFault::AuthorMismatch { id });
                }

                let origin = hop.proof.origin();
                if let Some(current) = &self.coordinate {
                    if &origin != current {
                        faults.push(ChainFault::ProofOrigin { id, expected: current.clone(), found: origin.clone() });
                    }
                }
                let proved = hop.proof.destination();
                if proved != hop.coordinate {
                    faults.push(ChainFault::ProofTarget { id, proved: proved.clone(), recorded: hop.coordinate.clone() });
                }
                // Sized from the coordinates, not the claimed heights.
                let height = estimate_cost(&origin, &proved).max();
                if height > self.height_limit {
                    faults.push(ChainFault::ProofTooTall { id, height, limit: self.height_limit });
                } else if !verify_movement_proof(&hop.proof) {
                    faults.push(ChainFault::ProofInvalid { id });
                }
            }
        }
        faults
    }

    /// Adopts `event` if it has no faults, otherwise returns the first one.
    pub fn apply(&mut self, event: &Event) -> Result<(), ChainFault> {
        if let Some(fault) = self.check(event).into_iter().next() {
            return Err(fault);
        }
        self.advance(event);
        Ok(())
    }

    /// Moves the cursor onto `event` without checking it.
    pub fn advance(&mut self, event: &Event) {
        if event.is_genesis() && self.genesis.is_none() {
            self.genesis = Some(event.id);
            self.author = Some(event.pubkey);
        }
        if let Some(prev) = event.prev {
            self.referenced.insert(prev);
        }
        self.tip = Some(event.id);
        self.coordinate = Some(event.coordinate().clone());
        self.len += 1;
    }
}
