//! Command handlers over an owned [`Registry`].

use anthropo_core::{
  PatientId, PatientStore, Registry,
  patient::Patient,
  stats::Report,
  validate::{PatientInput, validate},
};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

// ─── Edits ────────────────────────────────────────────────────────────────────

/// Field overrides for an edit; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct PatientEdit {
  pub last_name:   Option<String>,
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub gender:      Option<String>,
  pub birth_date:  Option<String>,
  pub height:      Option<String>,
  pub weight:      Option<String>,
}

impl PatientEdit {
  fn apply(self, mut input: PatientInput) -> PatientInput {
    let set = |slot: &mut String, value: Option<String>| {
      if let Some(v) = value {
        *slot = v;
      }
    };
    set(&mut input.last_name, self.last_name);
    set(&mut input.first_name, self.first_name);
    set(&mut input.middle_name, self.middle_name);
    set(&mut input.gender, self.gender);
    set(&mut input.birth_date, self.birth_date);
    set(&mut input.height, self.height);
    set(&mut input.weight, self.weight);
    input
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state: the registry and the date ages are
/// computed against.
pub struct App<S> {
  pub registry: Registry<S>,
  pub today:    NaiveDate,
}

impl<S: PatientStore> App<S> {
  pub fn new(registry: Registry<S>, today: NaiveDate) -> Self { Self { registry, today } }

  pub fn patients(&self) -> &[Patient] { self.registry.patients() }

  /// Validate `input` and append it as a new patient.
  pub fn add(&mut self, input: &PatientInput) -> Result<PatientId> {
    let details = validate(input, self.today).context("invalid patient data")?;
    let id = self.registry.add(details).context("failed to save new patient")?;
    tracing::info!(%id, "patient added");
    Ok(id)
  }

  /// Merge `edit` over the current values of patient `id`, validate the
  /// result, and replace every field.
  pub fn edit(&mut self, id: &str, edit: PatientEdit) -> Result<PatientId> {
    let id = self.resolve_id(id)?;
    let current = self
      .registry
      .get(&id)
      .map(|p| PatientInput::from_details(p.details()))
      .with_context(|| format!("patient {id} disappeared"))?;

    let details = validate(&edit.apply(current), self.today).context("invalid patient data")?;
    self
      .registry
      .update(&id, details)
      .with_context(|| format!("failed to save patient {id}"))?;
    tracing::info!(%id, "patient updated");
    Ok(id)
  }

  pub fn remove(&mut self, id: &str) -> Result<Patient> {
    let id = self.resolve_id(id)?;
    let removed = self
      .registry
      .remove(&id)
      .with_context(|| format!("failed to remove patient {id}"))?;
    tracing::info!(%id, "patient removed");
    Ok(removed)
  }

  /// Discard every patient and store `count` synthetic ones instead.
  pub fn reseed(&mut self, count: usize) -> Result<()> {
    self.registry.reseed(count).context("failed to store synthetic patients")
  }

  /// `None` when there is nothing to report on.
  pub fn report(&self, bins: usize) -> Option<Report> {
    if self.registry.is_empty() {
      return None;
    }
    Some(Report::compute(self.patients(), self.today, bins))
  }

  /// Accept a full id or an unambiguous prefix of one.
  pub fn resolve_id(&self, needle: &str) -> Result<PatientId> {
    let needle = needle.trim();
    if needle.is_empty() {
      bail!("patient id must not be empty");
    }
    let exact = PatientId::from(needle);
    if self.registry.get(&exact).is_some() {
      return Ok(exact);
    }

    let mut matches = self
      .patients()
      .iter()
      .filter(|p| p.id().as_str().starts_with(needle));
    match (matches.next(), matches.next()) {
      (Some(p), None) => Ok(p.id().clone()),
      (Some(_), Some(_)) => bail!("patient id prefix {needle:?} is ambiguous"),
      (None, _) => Err(anthropo_core::Error::PatientNotFound(exact).into()),
    }
  }
}
