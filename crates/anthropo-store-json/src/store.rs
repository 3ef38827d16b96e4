//! [`JsonFileStore`]: the JSON file implementation of [`PatientStore`].

use std::{
  fs,
  io::{self, Write as _},
  path::{Path, PathBuf},
};

use anthropo_core::{
  Patient, PatientStore, RandomSeedProvider, ResourceResolver, SeedProvider,
  resource::PATIENTS_RESOURCE,
};
use chrono::{Local, NaiveDate};
use tempfile::NamedTempFile;

use crate::{
  Error, Result, StoreUnreadable,
  encode::{decode_patients, encode_patients},
};

/// Number of synthetic patients written on a first run.
pub const DEFAULT_SYNTHETIC_COUNT: usize = 15;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A patient store backed by a single JSON file.
///
/// Assumes it is the file's only writer; there is no locking.
pub struct JsonFileStore {
  path:            PathBuf,
  seeds:           Box<dyn SeedProvider>,
  today:           NaiveDate,
  synthetic_count: usize,
}

impl JsonFileStore {
  /// A store at `path`. Nothing is read or written until the first
  /// [`load`](PatientStore::load) or [`save`](PatientStore::save).
  pub fn open(path: impl Into<PathBuf>) -> Self {
    Self {
      path:            path.into(),
      seeds:           Box::new(RandomSeedProvider::from_entropy()),
      today:           Local::now().date_naive(),
      synthetic_count: DEFAULT_SYNTHETIC_COUNT,
    }
  }

  /// A store at the location `resolver` gives for the patient data resource.
  pub fn open_resource(resolver: &impl ResourceResolver) -> Self {
    Self::open(resolver.resolve(PATIENTS_RESOURCE))
  }

  /// Replace the source of synthetic patients.
  pub fn with_seed_provider(mut self, seeds: impl SeedProvider + 'static) -> Self {
    self.seeds = Box::new(seeds);
    self
  }

  /// Fix the date synthetic ages are computed against.
  pub fn with_today(mut self, today: NaiveDate) -> Self {
    self.today = today;
    self
  }

  /// How many patients a first run is seeded with.
  pub fn with_synthetic_count(mut self, count: usize) -> Self {
    self.synthetic_count = count;
    self
  }

  pub fn path(&self) -> &Path { &self.path }

  fn read_existing(&self) -> Result<Vec<Patient>, StoreUnreadable> {
    let bytes = match fs::read(&self.path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreUnreadable::Missing),
      Err(e) => return Err(StoreUnreadable::Io(e)),
    };
    decode_patients(&bytes)
  }

  /// Write `bytes` to a sibling temp file and rename it over the target.
  fn write_atomic(&self, bytes: &[u8]) -> Result<()> {
    let dir = match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    let io_err = |source: io::Error| Error::Io { path: self.path.clone(), source };

    fs::create_dir_all(dir).map_err(io_err)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
    Ok(())
  }
}

// ─── PatientStore impl ───────────────────────────────────────────────────────

impl PatientStore for JsonFileStore {
  type Error = Error;

  fn load(&mut self) -> Result<Vec<Patient>> {
    match self.read_existing() {
      Ok(patients) => {
        tracing::info!(
          path = %self.path.display(),
          count = patients.len(),
          "loaded patients"
        );
        Ok(patients)
      }
      Err(reason) => {
        tracing::warn!(
          path = %self.path.display(),
          %reason,
          "patient store unreadable; seeding with synthetic patients"
        );
        let patients = self.generate_synthetic(self.synthetic_count);
        self.save(&patients)?;
        Ok(patients)
      }
    }
  }

  fn save(&mut self, patients: &[Patient]) -> Result<()> {
    let bytes = encode_patients(patients)?;
    self.write_atomic(&bytes)?;
    tracing::info!(
      path = %self.path.display(),
      count = patients.len(),
      "saved patients"
    );
    Ok(())
  }

  fn generate_synthetic(&mut self, count: usize) -> Vec<Patient> {
    self.seeds.generate(count, self.today)
  }
}
