//! Patient record: the one entity of the register.
//!
//! A [`Patient`] is an immutable [`PatientId`] plus a block of replaceable
//! [`PatientDetails`]. Age, BMI and BMI category are derived on demand and
//! never stored. [`PatientRecord`] is the flat key/value form written to disk.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Fixed on-disk birth date format: zero-padded day and month, four-digit year.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

// ─── Identity ────────────────────────────────────────────────────────────────

/// Opaque patient identifier. Freshly created records get a UUID v4; ids read
/// from disk are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
  pub fn generate() -> Self { Self(Uuid::new_v4().hyphenated().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for PatientId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<String> for PatientId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for PatientId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Gender ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  /// The token stored on disk. Cyrillic, so files written by earlier
  /// versions of the register stay readable.
  pub fn token(self) -> &'static str {
    match self {
      Self::Male => "М",
      Self::Female => "Ж",
    }
  }
}

impl fmt::Display for Gender {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Male => "male",
      Self::Female => "female",
    })
  }
}

impl FromStr for Gender {
  type Err = Error;

  /// Accepts the stored Cyrillic tokens as well as `male` / `female`.
  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "М" | "м" => Ok(Self::Male),
      "Ж" | "ж" => Ok(Self::Female),
      other => match other.to_ascii_lowercase().as_str() {
        "male" | "m" => Ok(Self::Male),
        "female" | "f" => Ok(Self::Female),
        _ => Err(Error::UnknownGender(s.to_owned())),
      },
    }
  }
}

// ─── BMI category ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
  Underweight,
  Normal,
  Overweight,
  Obese,
}

impl BmiCategory {
  /// Step function with breakpoints at 18.5, 25 and 30. A breakpoint value
  /// belongs to the bucket above it.
  pub fn from_bmi(bmi: f64) -> Self {
    if bmi < 18.5 {
      Self::Underweight
    } else if bmi < 25.0 {
      Self::Normal
    } else if bmi < 30.0 {
      Self::Overweight
    } else {
      Self::Obese
    }
  }
}

impl fmt::Display for BmiCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Underweight => "underweight",
      Self::Normal => "normal",
      Self::Overweight => "overweight",
      Self::Obese => "obese",
    })
  }
}

// ─── Derived values ──────────────────────────────────────────────────────────

/// Whole years elapsed between `birth` and `today`.
///
/// The year difference is reduced by one when `today` falls before the
/// birthday within its year.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
  let before_birthday = (today.month(), today.day()) < (birth.month(), birth.day());
  today.year() - birth.year() - i32::from(before_birthday)
}

/// Body-mass index rounded to two decimals, half away from zero. Zero for a
/// non-positive height.
pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
  if height_cm <= 0.0 {
    return 0.0;
  }
  let height_m = height_cm / 100.0;
  (weight_kg / (height_m * height_m) * 100.0).round() / 100.0
}

pub fn format_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

/// Parse a `DD-MM-YYYY` string. Unpadded or otherwise non-canonical input is
/// rejected even where chrono would accept it.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|_| Error::MalformedDate(s.to_owned()))?;
  if format_date(date) != s {
    return Err(Error::MalformedDate(s.to_owned()));
  }
  Ok(date)
}

// ─── Patient ─────────────────────────────────────────────────────────────────

/// Everything about a patient except the id. Replaced as a whole on edit.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientDetails {
  pub last_name:   String,
  pub first_name:  String,
  /// May be empty.
  pub middle_name: String,
  pub gender:      Gender,
  pub birth_date:  NaiveDate,
  /// Centimeters.
  pub height:      f64,
  /// Kilograms.
  pub weight:      f64,
}

impl PatientDetails {
  /// "Last First Middle", skipping an empty middle name.
  pub fn full_name(&self) -> String {
    [&self.last_name, &self.first_name, &self.middle_name]
      .into_iter()
      .filter(|part| !part.is_empty())
      .map(String::as_str)
      .collect::<Vec<_>>()
      .join(" ")
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
  id:      PatientId,
  details: PatientDetails,
}

impl Patient {
  /// Create a record with a freshly generated id.
  pub fn new(details: PatientDetails) -> Self { Self::with_id(PatientId::generate(), details) }

  pub fn with_id(id: PatientId, details: PatientDetails) -> Self { Self { id, details } }

  pub fn id(&self) -> &PatientId { &self.id }

  pub fn details(&self) -> &PatientDetails { &self.details }

  /// Replace every mutable field at once. The id is kept.
  pub fn replace_details(&mut self, details: PatientDetails) { self.details = details; }

  pub fn gender(&self) -> Gender { self.details.gender }

  pub fn age_on(&self, today: NaiveDate) -> i32 { age_on(self.details.birth_date, today) }

  pub fn bmi(&self) -> f64 { bmi(self.details.height, self.details.weight) }

  pub fn bmi_category(&self) -> BmiCategory { BmiCategory::from_bmi(self.bmi()) }

  pub fn birth_date_string(&self) -> String { format_date(self.details.birth_date) }

  /// Flatten into the on-disk form.
  pub fn to_record(&self) -> PatientRecord {
    let d = &self.details;
    PatientRecord {
      id:          Some(self.id.as_str().to_owned()),
      last_name:   Some(d.last_name.clone()),
      first_name:  Some(d.first_name.clone()),
      middle_name: Some(d.middle_name.clone()),
      gender:      Some(d.gender.token().to_owned()),
      birth_date:  Some(format_date(d.birth_date)),
      height:      Some(d.height),
      weight:      Some(d.weight),
    }
  }

  /// Rebuild a patient from its on-disk form.
  ///
  /// A missing `id` is generated and a missing `middle_name` becomes empty;
  /// every other field is required.
  pub fn from_record(record: PatientRecord) -> Result<Self> {
    let PatientRecord {
      id,
      last_name,
      first_name,
      middle_name,
      gender,
      birth_date,
      height,
      weight,
    } = record;

    let last_name = last_name.ok_or(Error::MissingField("last_name"))?;
    let first_name = first_name.ok_or(Error::MissingField("first_name"))?;
    let gender = gender.ok_or(Error::MissingField("gender"))?.parse()?;
    let birth_date = parse_date(&birth_date.ok_or(Error::MissingField("birth_date"))?)?;
    let height = height.ok_or(Error::MissingField("height"))?;
    let weight = weight.ok_or(Error::MissingField("weight"))?;

    let details = PatientDetails {
      last_name,
      first_name,
      middle_name: middle_name.unwrap_or_default(),
      gender,
      birth_date,
      height,
      weight,
    };

    Ok(match id {
      Some(id) => Self::with_id(id.into(), details),
      None => Self::new(details),
    })
  }
}

// ─── On-disk record ──────────────────────────────────────────────────────────

/// Flat key/value form of a [`Patient`].
///
/// Every field is optional here so that a missing key surfaces as
/// [`Error::MissingField`] from [`Patient::from_record`] rather than as an
/// opaque deserializer message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
  pub id:          Option<String>,
  pub last_name:   Option<String>,
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub gender:      Option<String>,
  /// `DD-MM-YYYY`.
  pub birth_date:  Option<String>,
  pub height:      Option<f64>,
  pub weight:      Option<f64>,
}
