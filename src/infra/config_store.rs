// ============================================================
// Layer 6 - Config Store
// ============================================================
// Reads and writes EngineConfig as pretty-printed JSON so a
// host application can pin its seeds in a file next to its
// other settings.
//
// Example file:
//   {
//     "weight_seed": 42,
//     "noise_seed": null,
//     "weight_scale": 0.01
//   }
//
// Missing keys fall back to EngineConfig::default(), so "{}"
// is a valid (fully random) configuration.
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json documentation

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::application::estimate_use_case::EngineConfig;

/// File name used when the caller only supplies a directory
pub const CONFIG_FILE_NAME: &str = "engine_config.json";

pub struct ConfigStore {
    /// Full path to the JSON file
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `<dir>/engine_config.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `cfg`, creating parent directories as needed.
    pub fn save(&self, cfg: &EngineConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write config to '{}'", self.path.display()))?;

        tracing::debug!("Saved engine config to '{}'", self.path.display());
        Ok(())
    }

    /// Read and validate the config file.
    pub fn load(&self) -> Result<EngineConfig> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read config from '{}'", self.path.display()))?;

        let cfg: EngineConfig = serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", self.path.display()))?;
        cfg.validate()
            .with_context(|| format!("Rejected config in '{}'", self.path.display()))?;

        tracing::debug!("Loaded engine config from '{}'", self.path.display());
        Ok(cfg)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(&self) -> Result<EngineConfig> {
        if !self.path.exists() {
            tracing::warn!(
                "No config at '{}'; using defaults",
                self.path.display()
            );
            return Ok(EngineConfig::default());
        }
        self.load()
    }
}
