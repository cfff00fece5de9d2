// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Persisted user settings (`config.json`).

use anyhow::Context;
use cyberspace_kernel::config::DEFAULT_MAX_LCA_HEIGHT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::warn;

pub const SETTINGS_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: u32,
    pub default_max_lca_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self { version: SETTINGS_FORMAT_VERSION, default_max_lca_height: DEFAULT_MAX_LCA_HEIGHT }
    }
}

impl Settings {
    /// Missing or unreadable settings fall back to the defaults.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read settings; using defaults");
                return Self::default();
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed settings; using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(self)?;
        {
            let mut file = fs::File::create(&tmp).with_context(|| format!("writing {}", tmp.display()))?;
            file.write_all(&body)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_malformed_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(Settings::load(&path), Settings::default());

        fs::write(&path, b"{not json").unwrap();
        assert_eq!(Settings::load(&path).default_max_lca_height, DEFAULT_MAX_LCA_HEIGHT);

        fs::write(&path, br#"{"default_max_lca_height": 12}"#).unwrap();
        let loaded = Settings::load(&path);
        assert_eq!(loaded.default_max_lca_height, 12);
        assert_eq!(loaded.version, SETTINGS_FORMAT_VERSION);
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let settings = Settings { default_max_lca_height: 9, ..Settings::default() };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
