//! Resource path resolution supplied by the hosting application.

use std::path::{Path, PathBuf};

/// Logical name of the patient data file.
pub const PATIENTS_RESOURCE: &str = "resources/data/patients_data.json";

/// Maps a logical resource name (a `/`-separated relative path) to a
/// location on disk.
pub trait ResourceResolver {
  fn resolve(&self, name: &str) -> PathBuf;
}

impl<F> ResourceResolver for F
where
  F: Fn(&str) -> PathBuf,
{
  fn resolve(&self, name: &str) -> PathBuf { self(name) }
}

/// Resolves every name underneath one base directory.
#[derive(Debug, Clone)]
pub struct BaseDirResolver {
  base: PathBuf,
}

impl BaseDirResolver {
  pub fn new(base: impl Into<PathBuf>) -> Self { Self { base: base.into() } }

  pub fn base(&self) -> &Path { &self.base }
}

impl ResourceResolver for BaseDirResolver {
  fn resolve(&self, name: &str) -> PathBuf {
    name
      .split('/')
      .filter(|segment| !segment.is_empty())
      .fold(self.base.clone(), |path, segment| path.join(segment))
  }
}
