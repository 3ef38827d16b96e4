//! Runtime settings, read from an optional TOML file and `ANTHROPO_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anthropo_store_json::DEFAULT_SYNTHETIC_COUNT;
use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// Base directory that resource names are resolved under.
  #[serde(default = "default_data_dir")]
  pub data_dir:        PathBuf,
  /// Patients generated when the store has to be seeded.
  #[serde(default = "default_synthetic_count")]
  pub synthetic_count: usize,
}

fn default_data_dir() -> PathBuf { PathBuf::from(".") }

fn default_synthetic_count() -> usize { DEFAULT_SYNTHETIC_COUNT }

impl Settings {
  /// Layer `file` (if it exists) under the environment.
  pub fn load(file: &Path) -> Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("ANTHROPO"))
      .build()
      .with_context(|| format!("failed to read config from {}", file.display()))?
      .try_deserialize()
      .context("failed to deserialise settings")
  }
}
