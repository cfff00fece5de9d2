// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Chain receipts.
//!
//! A receipt is produced only from a clean audit and pins the chain's exact
//! bytes with BLAKE3, so two parties can confirm they hold the same history
//! without exchanging it.
//!
//! # Guarantee
//! Same chain file => same receipt.

use crate::error::{ChainError, Result};
use crate::store::ChainStore;
use cyberspace_kernel::event::EventId;
use cyberspace_kernel::Coordinate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;

pub const RECEIPT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReceipt {
    pub format_version: u32,
    pub label: String,
    pub event_count: u64,
    pub genesis: EventId,
    pub tip: EventId,
    pub coordinate: Coordinate,
    /// BLAKE3 of the chain file, hex.
    pub file_hash: String,
}

impl ChainReceipt {
    /// Audits `label` and fingerprints it. Any fault is returned as `BrokenChain`.
    pub fn issue(store: &ChainStore, label: &str) -> Result<Self> {
        let report = store.audit(label)?;
        if let Some(first) = report.faults.first() {
            return Err(ChainError::BrokenChain {
                label: report.label.clone(),
                line: first.line,
                fault: first.fault.to_string(),
            });
        }
        let (genesis, tip, coordinate) = match (report.genesis, report.tip, report.coordinate) {
            (Some(genesis), Some(tip), Some(coordinate)) => (genesis, tip, coordinate),
            _ => return Err(ChainError::EmptyChain(report.label)),
        };
        let file_hash = hex::encode(compute_chain_hash(store.chain_path(&report.label)?)?);
        Ok(Self {
            format_version: RECEIPT_FORMAT_VERSION,
            label: report.label,
            event_count: report.events,
            genesis,
            tip,
            coordinate,
            file_hash,
        })
    }

    /// Same history: label is ignored, since a chain may be stored under another name.
    pub fn matches(&self, other: &ChainReceipt) -> bool {
        self.file_hash == other.file_hash
            && self.genesis == other.genesis
            && self.tip == other.tip
            && self.event_count == other.event_count
    }
}

/// BLAKE3 of the whole chain file.
pub fn compute_chain_hash(path: impl AsRef<Path>) -> std::io::Result<[u8; 32]> {
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut File::open(path)?, &mut hasher)?;
    Ok(hasher.finalize().into())
}
