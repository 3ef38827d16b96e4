//! Error types for `anthropo-store-json`.

use std::path::PathBuf;

use anthropo_core::PatientId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] anthropo_core::Error),

  /// The store could not be written. Never retried.
  #[error("i/o error on {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why an existing store file could not be used.
///
/// Never returned to callers: `load` logs it and reseeds the store.
#[derive(Debug, Error)]
pub enum StoreUnreadable {
  #[error("store file does not exist")]
  Missing,

  #[error("cannot read store file: {0}")]
  Io(#[from] std::io::Error),

  #[error("store file is not a JSON list of patient records: {0}")]
  Syntax(#[from] serde_json::Error),

  #[error("patient record {index} is invalid: {source}")]
  Record {
    index:  usize,
    #[source]
    source: anthropo_core::Error,
  },

  #[error("patient record {index} repeats id {id}")]
  DuplicateId { index: usize, id: PatientId },
}
