// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Cached process state.
//!
//! `state.json` remembers the active chain, its tip and the coordinate there,
//! so routine commands do not replay. It is derived data: the chain file is
//! authoritative and [`StateFile::reconcile`] repairs the cache from it.

use crate::error::{ChainError, Result};
use crate::store::{normalize_label, ChainStore};
use cyberspace_kernel::event::{Event, EventId, PublicKey};
use cyberspace_kernel::Coordinate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const STATE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub pubkey: PublicKey,
    /// Hex secret key, kept for publish-time signing.
    pub secret: String,
}

/// A saved destination for `move` without arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub label: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub version: u32,
    pub active_chain: String,
    pub coordinate: Coordinate,
    pub tip: EventId,
    pub identity: Identity,
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub active_target: Option<String>,
}

impl State {
    pub fn new(active_chain: String, tip: &Event, identity: Identity) -> Self {
        Self {
            version: STATE_FORMAT_VERSION,
            active_chain,
            coordinate: tip.coordinate().clone(),
            tip: tip.id,
            identity,
            targets: Vec::new(),
            active_target: None,
        }
    }
}

/// `State` bound to its file. Every mutation is followed by [`StateFile::save`].
#[derive(Debug)]
pub struct StateFile {
    path: PathBuf,
    state: State,
}

impl StateFile {
    /// `Ok(None)` when no state has been written yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref().to_path_buf();
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state: State = serde_json::from_slice(&raw)?;
        Ok(Some(Self { path, state }))
    }

    pub fn create(path: impl AsRef<Path>, state: State) -> Result<Self> {
        let file = Self { path: path.as_ref().to_path_buf(), state };
        file.save()?;
        Ok(file)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to a sibling temp file, then rename over the old state.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(&self.state)?;
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&body)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Records a freshly appended event of the active chain.
    pub fn checkpoint(&mut self, event: &Event) -> Result<()> {
        self.state.tip = event.id;
        self.state.coordinate = event.coordinate().clone();
        self.save()
    }

    /// Makes `label` active and adopts its tip.
    pub fn switch_chain(&mut self, store: &ChainStore, label: &str) -> Result<()> {
        let label = normalize_label(label)?;
        let tip = store.tip(&label)?;
        self.state.active_chain = label;
        self.checkpoint(&tip)
    }

    /// Validates the cache against the active chain's tip.
    ///
    /// A stale cache is rebuilt by replaying the chain, so a damaged chain
    /// is reported here rather than adopted. Returns `true` if the cache was
    /// rewritten.
    pub fn reconcile(&mut self, store: &ChainStore) -> Result<bool> {
        let tip = store.tip(&self.state.active_chain)?;
        if tip.id == self.state.tip && tip.coordinate() == &self.state.coordinate {
            return Ok(false);
        }
        warn!(
            chain = %self.state.active_chain,
            cached = %self.state.tip.short(),
            actual = %tip.id.short(),
            "state cache is stale; rebuilding from the chain"
        );

        let mut replay = store.replay(&self.state.active_chain)?;
        for event in replay.by_ref() {
            event?;
        }
        let (Some(tip), Some(coordinate)) = (replay.tip().copied(), replay.coordinate().cloned()) else {
            return Err(ChainError::EmptyChain(self.state.active_chain.clone()));
        };
        self.state.tip = tip;
        self.state.coordinate = coordinate;
        self.save()?;
        info!(chain = %self.state.active_chain, events = replay.replayed(), "state rebuilt by replay");
        Ok(true)
    }

    /// Saves `coordinate` as a target and makes it current; returns its label.
    ///
    /// With a label, that target is created or moved. Without one, a target
    /// already at `coordinate` is reused, otherwise a new `unnamed_N` is made.
    pub fn set_target(&mut self, coordinate: Coordinate, label: Option<&str>) -> Result<String> {
        let label = match label {
            Some(label) => {
                let label = normalize_label(label)?;
                let existing = self.state.targets.iter().position(|t| t.label == label);
                match existing {
                    Some(i) => self.state.targets[i].coordinate = coordinate,
                    None => self.state.targets.push(Target { label: label.clone(), coordinate }),
                }
                label
            }
            None => {
                let existing = self.state.targets.iter().position(|t| t.coordinate == coordinate);
                match existing {
                    Some(i) => self.state.targets[i].label.clone(),
                    None => {
                        let label = self.next_unnamed_label();
                        self.state.targets.push(Target { label: label.clone(), coordinate });
                        label
                    }
                }
            }
        };
        self.state.active_target = Some(label.clone());
        self.save()?;
        info!(target = %label, "target set");
        Ok(label)
    }

    pub fn use_target(&mut self, label: &str) -> Result<Target> {
        let label = normalize_label(label)?;
        let target = self
            .state
            .targets
            .iter()
            .find(|t| t.label == label)
            .cloned()
            .ok_or_else(|| ChainError::UnknownTarget(label.clone()))?;
        self.state.active_target = Some(label);
        self.save()?;
        Ok(target)
    }

    pub fn current_target(&self) -> Option<&Target> {
        let active = self.state.active_target.as_deref()?;
        self.state.targets.iter().find(|t| t.label == active)
    }

    pub fn targets(&self) -> &[Target] {
        &self.state.targets
    }

    fn next_unnamed_label(&self) -> String {
        let highest = self
            .state
            .targets
            .iter()
            .filter_map(|t| t.label.strip_prefix("unnamed_")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("unnamed_{}", highest + 1)
    }
}
