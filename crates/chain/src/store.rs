// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The Chain Store: one append-only file per chain label.
//!
//! # Lifecycle
//! `Absent -> Genesis` via [`ChainStore::create_chain`], then
//! `Genesis, Hop*` via [`ChainStore::append_hop`]. Nothing ever removes or
//! reorders an event.
//!
//! # Concurrency
//! Appends to one label are serialised by an in-process lock. Readers never
//! take it: they only see newline-terminated records, so a concurrent append
//! is either fully visible or not at all.

use crate::error::{ChainError, Result};
use crate::log::{append_record, create_log, ChainLogReader};
use chrono::Utc;
use cyberspace_kernel::config::DEFAULT_MAX_LCA_HEIGHT;
use cyberspace_kernel::event::{Event, EventId, PublicKey};
use cyberspace_kernel::movement::MovementProof;
use cyberspace_kernel::replay::{ChainCursor, ChainFault};
use cyberspace_kernel::Coordinate;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const CHAIN_EXT: &str = "jsonl";

pub(crate) fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Trims `label` and maps every character outside `[A-Za-z0-9._-]` to `_`.
pub fn normalize_label(label: &str) -> Result<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(ChainError::InvalidLabel(label.to_string()));
    }
    let normalized: String = trimmed
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    if normalized.chars().all(|c| c == '.') {
        return Err(ChainError::InvalidLabel(label.to_string()));
    }
    Ok(normalized)
}

pub struct ChainStore {
    root: PathBuf,
    writers: Mutex<FxHashMap<String, Arc<Mutex<()>>>>,
    verify_height: u32,
}

impl ChainStore {
    /// Opens (creating if needed) the chain directory at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root, writers: Mutex::new(FxHashMap::default()), verify_height: DEFAULT_MAX_LCA_HEIGHT })
    }

    /// Tallest hop that replay and audit will verify. Taller hops are
    /// reported as `ProofTooTall` without computing their proofs.
    pub fn with_verify_height(mut self, limit: u32) -> Self {
        self.verify_height = limit;
        self
    }

    pub fn verify_height(&self) -> u32 {
        self.verify_height
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn chain_path(&self, label: &str) -> Result<PathBuf> {
        let label = normalize_label(label)?;
        Ok(self.root.join(format!("{label}.{CHAIN_EXT}")))
    }

    pub fn exists(&self, label: &str) -> Result<bool> {
        Ok(self.chain_path(label)?.is_file())
    }

    /// Writes the genesis event of a new chain.
    pub fn create_chain(&self, label: &str, author: PublicKey, initial: Coordinate) -> Result<Event> {
        let label = normalize_label(label)?;
        let path = self.chain_path(&label)?;
        let genesis = Event::genesis(author, unix_now(), initial)?;
        match create_log(&path, &genesis) {
            Ok(()) => {}
            Err(ChainError::Io(e)) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ChainError::ChainExists(label));
            }
            Err(e) => return Err(e),
        }
        info!(chain = %label, id = %genesis.id.short(), coordinate = %genesis.coordinate(), "created chain");
        Ok(genesis)
    }

    /// The sole mutation entry point. Appends exactly one hop or nothing.
    ///
    /// The proof must start at the current tip and end at `resulting`.
    pub fn append_hop(
        &self,
        label: &str,
        proof: MovementProof,
        resulting: &Coordinate,
        author: PublicKey,
    ) -> Result<Event> {
        let label = normalize_label(label)?;
        let lock = self.writer_lock(&label);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let tip = self.appendable_tip(&label)?;
        let origin = proof.origin();
        if &origin != tip.coordinate() {
            return Err(ChainError::ProofMismatch(format!(
                "proof starts at {origin}, chain {label:?} is at {}",
                tip.coordinate()
            )));
        }
        let destination = proof.destination();
        if &destination != resulting {
            return Err(ChainError::ProofMismatch(format!(
                "proof ends at {destination}, hop records {resulting}"
            )));
        }

        debug!(chain = %label, cost = %proof.cost(), "appending hop");
        let event = Event::hop(author, unix_now(), tip.id, tip.genesis_id(), resulting.clone(), proof)?;
        append_record(&self.chain_path(&label)?, &event)?;
        info!(chain = %label, id = %event.id.short(), coordinate = %resulting, "appended hop");
        Ok(event)
    }

    /// Tip of a chain whose file ends on a record boundary.
    fn appendable_tip(&self, label: &str) -> Result<Event> {
        let mut reader = self.reader(label)?;
        let mut last = None;
        for event in reader.by_ref() {
            last = Some(event?);
        }
        if let Some(line) = reader.torn_line() {
            return Err(ChainError::BrokenChain {
                label: label.to_string(),
                line,
                fault: "unterminated record left by an interrupted append; repair the file before appending".into(),
            });
        }
        last.ok_or_else(|| ChainError::EmptyChain(label.to_string()))
    }

    fn writer_lock(&self, label: &str) -> Arc<Mutex<()>> {
        let mut writers = self.writers.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writers.entry(label.to_string()).or_default().clone()
    }

    fn reader(&self, label: &str) -> Result<ChainLogReader> {
        let label = normalize_label(label)?;
        let path = self.chain_path(&label)?;
        match ChainLogReader::open(&label, &path) {
            Err(ChainError::Io(e)) if e.kind() == ErrorKind::NotFound => Err(ChainError::NoSuchChain(label)),
            other => other,
        }
    }

    /// Every stored event in order. Records are parsed but not link-checked.
    pub fn read_events(&self, label: &str) -> Result<Vec<Event>> {
        self.reader(label)?.collect()
    }

    pub fn tip(&self, label: &str) -> Result<Event> {
        let label = normalize_label(label)?;
        let mut last = None;
        for event in self.reader(&label)? {
            last = Some(event?);
        }
        last.ok_or(ChainError::EmptyChain(label))
    }

    pub fn genesis(&self, label: &str) -> Result<Event> {
        let label = normalize_label(label)?;
        let first = match self.reader(&label)?.next() {
            Some(first) => first?,
            None => return Err(ChainError::EmptyChain(label)),
        };
        if !first.is_genesis() {
            return Err(ChainError::BrokenChain {
                label,
                line: 1,
                fault: ChainFault::MissingGenesis.to_string(),
            });
        }
        Ok(first)
    }

    pub fn length(&self, label: &str) -> Result<u64> {
        let mut count = 0u64;
        for event in self.reader(label)? {
            event?;
            count += 1;
        }
        Ok(count)
    }

    /// Labels of every chain file, sorted.
    pub fn list_labels(&self) -> Result<Vec<String>> {
        let mut labels = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(CHAIN_EXT) || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                labels.push(stem.to_string());
            }
        }
        labels.sort();
        Ok(labels)
    }

    /// Lazy, restartable, fully checked replay.
    pub fn replay(&self, label: &str) -> Result<Replay> {
        let label = normalize_label(label)?;
        let reader = self.reader(&label)?;
        let cursor = ChainCursor::with_height_limit(self.verify_height);
        Ok(Replay { label, reader, cursor, failed: false })
    }

    /// Replays to the end, returning every event and the final coordinate.
    pub fn replay_all(&self, label: &str) -> Result<(Vec<Event>, Coordinate)> {
        let mut replay = self.replay(label)?;
        let events = replay.by_ref().collect::<Result<Vec<_>>>()?;
        let coordinate = replay.coordinate().cloned().ok_or_else(|| ChainError::EmptyChain(replay.label.clone()))?;
        info!(chain = %replay.label, events = events.len(), coordinate = %coordinate, "replayed chain");
        Ok((events, coordinate))
    }

    /// Checks the whole chain and reports every fault instead of stopping at the first.
    pub fn audit(&self, label: &str) -> Result<AuditReport> {
        let label = normalize_label(label)?;
        let mut reader = self.reader(&label)?;
        let mut cursor = ChainCursor::with_height_limit(self.verify_height);
        let mut faults = Vec::new();
        while let Some(event) = reader.next() {
            let event = event?;
            let line = reader.line();
            faults.extend(cursor.check(&event).into_iter().map(|fault| LineFault { line, fault }));
            cursor.advance(&event);
        }
        if cursor.is_empty() {
            return Err(ChainError::EmptyChain(label));
        }
        info!(chain = %label, events = cursor.len(), faults = faults.len(), "audited chain");
        Ok(AuditReport {
            label,
            events: cursor.len(),
            genesis: cursor.genesis().copied(),
            tip: cursor.tip().copied(),
            coordinate: cursor.coordinate().cloned(),
            faults,
        })
    }
}

/// Iterator over a chain that checks each event against everything before it.
///
/// Stops after the first fault, which it yields as `BrokenChain`.
pub struct Replay {
    label: String,
    reader: ChainLogReader,
    cursor: ChainCursor,
    failed: bool,
}

impl Replay {
    /// Starts over from genesis.
    pub fn rewind(&mut self) -> Result<()> {
        self.reader.rewind()?;
        self.cursor = ChainCursor::with_height_limit(self.cursor.height_limit());
        self.failed = false;
        Ok(())
    }

    /// Coordinate after the events replayed so far.
    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.cursor.coordinate()
    }

    pub fn tip(&self) -> Option<&EventId> {
        self.cursor.tip()
    }

    pub fn replayed(&self) -> u64 {
        self.cursor.len()
    }
}

impl Iterator for Replay {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let event = match self.reader.next()? {
            Ok(event) => event,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };
        match self.cursor.apply(&event) {
            Ok(()) => Some(Ok(event)),
            Err(fault) => {
                self.failed = true;
                Some(Err(ChainError::BrokenChain {
                    label: self.label.clone(),
                    line: self.reader.line(),
                    fault: fault.to_string(),
                }))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineFault {
    pub line: u64,
    #[serde(flatten)]
    pub fault: ChainFault,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub label: String,
    pub events: u64,
    pub genesis: Option<EventId>,
    pub tip: Option<EventId>,
    pub coordinate: Option<Coordinate>,
    pub faults: Vec<LineFault>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}
