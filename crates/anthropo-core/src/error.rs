//! Error types for `anthropo-core`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{patient::PatientId, validate::Measure};

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("malformed date {0:?}: expected DD-MM-YYYY")]
  MalformedDate(String),

  #[error("unknown gender token: {0:?}")]
  UnknownGender(String),

  #[error("required field is empty: {0}")]
  EmptyField(&'static str),

  #[error("{measure} is not a number: {value:?}")]
  NotANumber { measure: Measure, value: String },

  #[error("{measure} {value} is outside the accepted range {min}..={max}")]
  OutOfRange {
    measure: Measure,
    value:   f64,
    min:     f64,
    max:     f64,
  },

  #[error("birth date {0} is in the future")]
  FutureBirthDate(NaiveDate),

  #[error("patient not found: {0}")]
  PatientNotFound(PatientId),

  #[error("duplicate patient id: {0}")]
  DuplicateId(PatientId),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
