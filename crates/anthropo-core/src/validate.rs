//! Input validation: the boundary between untrusted form values and
//! [`PatientDetails`].
//!
//! Nothing that fails here is ever constructed as a patient, so nothing that
//! fails here can reach the store.

use std::fmt;

use chrono::NaiveDate;

use crate::{
  Error, Result,
  patient::{Gender, PatientDetails, age_on, parse_date},
};

pub const MIN_HEIGHT_CM: f64 = 50.0;
pub const MAX_HEIGHT_CM: f64 = 250.0;
pub const MIN_WEIGHT_KG: f64 = 1.0;
pub const MAX_WEIGHT_KG: f64 = 300.0;
pub const MIN_AGE_YEARS: i32 = 1;
pub const MAX_AGE_YEARS: i32 = 130;

/// The range-checked quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
  Height,
  Weight,
  Age,
}

impl fmt::Display for Measure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Height => "height (cm)",
      Self::Weight => "weight (kg)",
      Self::Age => "age (years)",
    })
  }
}

/// Raw values as typed by a user.
#[derive(Debug, Clone, Default)]
pub struct PatientInput {
  pub last_name:   String,
  pub first_name:  String,
  pub middle_name: String,
  pub gender:      String,
  /// `DD-MM-YYYY`.
  pub birth_date:  String,
  pub height:      String,
  pub weight:      String,
}

impl PatientInput {
  /// Pre-fill from existing details, e.g. before applying an edit.
  pub fn from_details(details: &PatientDetails) -> Self {
    Self {
      last_name:   details.last_name.clone(),
      first_name:  details.first_name.clone(),
      middle_name: details.middle_name.clone(),
      gender:      details.gender.token().to_owned(),
      birth_date:  crate::patient::format_date(details.birth_date),
      height:      details.height.to_string(),
      weight:      details.weight.to_string(),
    }
  }
}

/// Check `input` against `today` and build validated details.
///
/// Order: required names and gender, then height and weight, then birth
/// date, then the age derived from it. The first failure is returned.
pub fn validate(input: &PatientInput, today: NaiveDate) -> Result<PatientDetails> {
  let last_name = required("last_name", &input.last_name)?;
  let first_name = required("first_name", &input.first_name)?;
  let gender: Gender = required("gender", &input.gender)?.parse()?;

  let height = in_range(
    Measure::Height,
    number(Measure::Height, &input.height)?,
    MIN_HEIGHT_CM,
    MAX_HEIGHT_CM,
  )?;
  let weight = in_range(
    Measure::Weight,
    number(Measure::Weight, &input.weight)?,
    MIN_WEIGHT_KG,
    MAX_WEIGHT_KG,
  )?;

  let birth_date = parse_date(input.birth_date.trim())?;
  check_birth_date(birth_date, today)?;

  Ok(PatientDetails {
    last_name,
    first_name,
    middle_name: input.middle_name.trim().to_owned(),
    gender,
    birth_date,
    height,
    weight,
  })
}

/// A birth date must not be in the future and must give an age within
/// [`MIN_AGE_YEARS`]..=[`MAX_AGE_YEARS`] on `today`.
pub fn check_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Result<()> {
  if birth_date > today {
    return Err(Error::FutureBirthDate(birth_date));
  }
  let age = age_on(birth_date, today);
  in_range(
    Measure::Age,
    f64::from(age),
    f64::from(MIN_AGE_YEARS),
    f64::from(MAX_AGE_YEARS),
  )?;
  Ok(())
}

fn required(field: &'static str, value: &str) -> Result<String> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Error::EmptyField(field));
  }
  Ok(value.to_owned())
}

fn number(measure: Measure, raw: &str) -> Result<f64> {
  raw
    .trim()
    .replace(',', ".")
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite())
    .ok_or_else(|| Error::NotANumber { measure, value: raw.to_owned() })
}

fn in_range(measure: Measure, value: f64, min: f64, max: f64) -> Result<f64> {
  if (min..=max).contains(&value) {
    Ok(value)
  } else {
    Err(Error::OutOfRange { measure, value, min, max })
  }
}
