// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The cyberspace home directory.
//!
//! ```text
//! <home>/state.json         cached process state
//! <home>/config.json        settings
//! <home>/chains/<label>.jsonl
//! ```

use crate::settings::Settings;
use anyhow::{anyhow, Context};
use cyberspace_chain::{ChainStore, StateFile};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Home {
    root: PathBuf,
}

impl Home {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `--home` / `CYBERSPACE_HOME` if given, else `~/.cyberspace`.
    pub fn resolve(explicit: Option<PathBuf>) -> anyhow::Result<Self> {
        match explicit {
            Some(root) => Ok(Self::new(root)),
            None => {
                let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot locate the user home directory; pass --home"))?;
                Ok(Self::new(home.join(".cyberspace")))
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn chains_dir(&self) -> PathBuf {
        self.root.join("chains")
    }

    /// Store that verifies hops up to the configured LCA ceiling.
    pub fn store(&self) -> anyhow::Result<ChainStore> {
        self.store_verifying(self.settings().default_max_lca_height)
    }

    pub fn store_verifying(&self, max_height: u32) -> anyhow::Result<ChainStore> {
        let store = ChainStore::open(self.chains_dir())
            .with_context(|| format!("opening {}", self.chains_dir().display()))?;
        Ok(store.with_verify_height(max_height))
    }

    pub fn settings(&self) -> Settings {
        Settings::load(&self.settings_path())
    }

    /// Loaded state, or an error telling the user to spawn first.
    pub fn require_state(&self) -> anyhow::Result<StateFile> {
        StateFile::load(self.state_path())
            .with_context(|| format!("reading {}", self.state_path().display()))?
            .ok_or_else(|| anyhow!("no state at {}; run `cyberspace spawn` first", self.state_path().display()))
    }

    /// State validated against its chain tip.
    pub fn reconciled_state(&self, store: &ChainStore) -> anyhow::Result<StateFile> {
        let mut state = self.require_state()?;
        state.reconcile(store).context("checking state against the chain")?;
        Ok(state)
    }
}
