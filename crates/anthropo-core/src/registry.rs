//! [`Registry`]: the owned, in-memory patient collection.
//!
//! The registry is the only holder of the working collection. Every mutation
//! builds the next collection, saves it through the store, and swaps it in
//! only once the save succeeded, so memory never runs ahead of disk.

use std::collections::HashSet;

use crate::{
  Error, Result,
  patient::{Patient, PatientDetails, PatientId},
  store::PatientStore,
};

pub struct Registry<S> {
  store:    S,
  patients: Vec<Patient>,
}

impl<S: PatientStore> Registry<S> {
  /// Load the collection from `store` and take ownership of both. A loaded
  /// collection with a repeated id is refused.
  pub fn open(mut store: S) -> Result<Self> {
    let patients = store.load().map_err(store_error)?;
    if let Some(dup) = first_duplicate(&patients) {
      return Err(Error::DuplicateId(dup));
    }
    tracing::debug!(count = patients.len(), "registry opened");
    Ok(Self { store, patients })
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn patients(&self) -> &[Patient] { &self.patients }

  pub fn get(&self, id: &PatientId) -> Option<&Patient> {
    self.patients.iter().find(|p| p.id() == id)
  }

  pub fn len(&self) -> usize { self.patients.len() }

  pub fn is_empty(&self) -> bool { self.patients.is_empty() }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Append a new patient built from validated `details`.
  pub fn add(&mut self, details: PatientDetails) -> Result<PatientId> {
    let patient = Patient::new(details);
    let id = patient.id().clone();
    self.insert(patient)?;
    Ok(id)
  }

  /// Append an already-built patient. Its id must not be present yet.
  pub fn insert(&mut self, patient: Patient) -> Result<()> {
    if self.get(patient.id()).is_some() {
      return Err(Error::DuplicateId(patient.id().clone()));
    }
    let mut next = self.patients.clone();
    next.push(patient);
    self.commit(next)
  }

  /// Replace every field of patient `id`, keeping its id and position.
  pub fn update(&mut self, id: &PatientId, details: PatientDetails) -> Result<()> {
    let idx = self.position(id)?;
    let mut next = self.patients.clone();
    next[idx].replace_details(details);
    self.commit(next)
  }

  /// Remove patient `id` and return it.
  pub fn remove(&mut self, id: &PatientId) -> Result<Patient> {
    let idx = self.position(id)?;
    let mut next = self.patients.clone();
    let removed = next.remove(idx);
    self.commit(next)?;
    Ok(removed)
  }

  /// Replace the whole collection. Ids must be unique.
  pub fn replace_all(&mut self, patients: Vec<Patient>) -> Result<()> {
    if let Some(dup) = first_duplicate(&patients) {
      return Err(Error::DuplicateId(dup));
    }
    self.commit(patients)
  }

  /// Replace the whole collection with `count` fresh synthetic patients.
  pub fn reseed(&mut self, count: usize) -> Result<()> {
    let patients = self.store.generate_synthetic(count);
    self.replace_all(patients)
  }

  fn position(&self, id: &PatientId) -> Result<usize> {
    self
      .patients
      .iter()
      .position(|p| p.id() == id)
      .ok_or_else(|| Error::PatientNotFound(id.clone()))
  }

  /// The single write path: persist `next`, then make it current.
  fn commit(&mut self, next: Vec<Patient>) -> Result<()> {
    self.store.save(&next).map_err(store_error)?;
    tracing::debug!(count = next.len(), "registry committed");
    self.patients = next;
    Ok(())
  }
}

fn first_duplicate(patients: &[Patient]) -> Option<PatientId> {
  let mut seen = HashSet::with_capacity(patients.len());
  patients
    .iter()
    .map(Patient::id)
    .find(|id| !seen.insert(*id))
    .cloned()
}

fn store_error<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::{
    patient::Gender,
    seed::{RandomSeedProvider, SeedProvider},
  };

  #[derive(Debug, thiserror::Error)]
  #[error("disk full")]
  struct DiskFull;

  /// Keeps the last saved collection and can be told to fail writes.
  struct MemoryStore {
    saved:      Vec<Patient>,
    saves:      usize,
    fail_saves: bool,
    seeds:      RandomSeedProvider,
  }

  impl MemoryStore {
    fn with(patients: Vec<Patient>) -> Self {
      Self {
        saved:      patients,
        saves:      0,
        fail_saves: false,
        seeds:      RandomSeedProvider::seeded(3),
      }
    }
  }

  impl PatientStore for MemoryStore {
    type Error = DiskFull;

    fn load(&mut self) -> Result<Vec<Patient>, DiskFull> { Ok(self.saved.clone()) }

    fn save(&mut self, patients: &[Patient]) -> Result<(), DiskFull> {
      if self.fail_saves {
        return Err(DiskFull);
      }
      self.saves += 1;
      self.saved = patients.to_vec();
      Ok(())
    }

    fn generate_synthetic(&mut self, count: usize) -> Vec<Patient> {
      self.seeds.generate(count, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }
  }

  fn details(last: &str) -> PatientDetails {
    PatientDetails {
      last_name:   last.into(),
      first_name:  "Анна".into(),
      middle_name: String::new(),
      gender:      Gender::Female,
      birth_date:  NaiveDate::from_ymd_opt(1985, 3, 8).unwrap(),
      height:      168.0,
      weight:      61.0,
    }
  }

  fn registry() -> Registry<MemoryStore> { Registry::open(MemoryStore::with(Vec::new())).unwrap() }

  #[test]
  fn add_persists_and_returns_id() {
    let mut r = registry();
    let id = r.add(details("Орлова")).unwrap();
    assert_eq!(r.len(), 1);
    assert_eq!(r.get(&id).unwrap().details().last_name, "Орлова");
    assert_eq!(r.store.saves, 1);
    assert_eq!(r.store.saved, r.patients());
  }

  #[test]
  fn update_keeps_id_and_position() {
    let mut r = registry();
    let a = r.add(details("Орлова")).unwrap();
    let b = r.add(details("Зайцева")).unwrap();

    r.update(&a, details("Белова")).unwrap();
    assert_eq!(r.patients()[0].id(), &a);
    assert_eq!(r.patients()[0].details().last_name, "Белова");
    assert_eq!(r.patients()[1].id(), &b);
    assert_eq!(r.store.saved[0].details().last_name, "Белова");
  }

  #[test]
  fn remove_returns_patient() {
    let mut r = registry();
    let a = r.add(details("Орлова")).unwrap();
    let removed = r.remove(&a).unwrap();
    assert_eq!(removed.id(), &a);
    assert!(r.is_empty());
    assert!(r.store.saved.is_empty());
  }

  #[test]
  fn unknown_id_is_not_found() {
    let mut r = registry();
    let ghost = PatientId::from("ghost");
    assert!(matches!(r.remove(&ghost), Err(Error::PatientNotFound(_))));
    assert!(matches!(
      r.update(&ghost, details("Орлова")),
      Err(Error::PatientNotFound(_))
    ));
    assert_eq!(r.store.saves, 0);
  }

  #[test]
  fn duplicate_ids_are_rejected() {
    let mut r = registry();
    let p = Patient::new(details("Орлова"));
    r.insert(p.clone()).unwrap();
    assert!(matches!(r.insert(p.clone()), Err(Error::DuplicateId(_))));
    assert!(matches!(
      r.replace_all(vec![p.clone(), p]),
      Err(Error::DuplicateId(_))
    ));
    assert_eq!(r.len(), 1);
  }

  #[test]
  fn open_refuses_repeated_ids() {
    let p = Patient::with_id("dup".into(), details("Орлова"));
    let q = Patient::with_id("dup".into(), details("Зайцева"));
    let result = Registry::open(MemoryStore::with(vec![p, q]));
    assert!(matches!(result, Err(Error::DuplicateId(id)) if id.as_str() == "dup"));
  }

  #[test]
  fn failed_save_leaves_collection_untouched() {
    let mut r = registry();
    let id = r.add(details("Орлова")).unwrap();
    r.store.fail_saves = true;

    assert!(matches!(r.add(details("Зайцева")), Err(Error::Store(_))));
    assert!(matches!(r.remove(&id), Err(Error::Store(_))));
    assert_eq!(r.len(), 1);
    assert_eq!(r.get(&id).unwrap().details().last_name, "Орлова");
  }

  #[test]
  fn reseed_replaces_everything() {
    let mut r = registry();
    r.add(details("Орлова")).unwrap();
    r.reseed(5).unwrap();
    assert_eq!(r.len(), 5);
    assert_eq!(r.store.saved.len(), 5);
  }
}
