//! Seed data provider: synthetic patients for a first run.
//!
//! The store calls a [`SeedProvider`] when there is nothing usable on disk.
//! [`RandomSeedProvider`] draws Russian names that agree with the drawn
//! gender; the data carries no meaning beyond being valid.

use chrono::{Days, Months, NaiveDate};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::patient::{Gender, Patient, PatientDetails, PatientId};

pub const MIN_SEED_AGE: u32 = 18;
pub const MAX_SEED_AGE: u32 = 90;
pub const SEED_HEIGHT_CM: (u32, u32) = (150, 200);
pub const SEED_WEIGHT_KG: (u32, u32) = (50, 120);

/// Source of synthetic patients.
pub trait SeedProvider {
  /// Produce `count` valid patients whose ages are computed against `today`.
  fn generate(&mut self, count: usize, today: NaiveDate) -> Vec<Patient>;
}

// ─── Name tables ─────────────────────────────────────────────────────────────

struct NameTable {
  first:  &'static [&'static str],
  last:   &'static [&'static str],
  middle: &'static [&'static str],
}

const MALE_NAMES: NameTable = NameTable {
  first:  &[
    "Александр", "Алексей", "Андрей", "Борис", "Владимир", "Геннадий",
    "Дмитрий", "Евгений", "Иван", "Игорь", "Константин", "Михаил",
    "Николай", "Павел", "Сергей", "Юрий",
  ],
  last:   &[
    "Иванов", "Смирнов", "Кузнецов", "Попов", "Васильев", "Петров",
    "Соколов", "Михайлов", "Новиков", "Фёдоров", "Морозов", "Волков",
    "Алексеев", "Лебедев", "Семёнов", "Егоров",
  ],
  middle: &[
    "Александрович", "Алексеевич", "Андреевич", "Борисович",
    "Владимирович", "Дмитриевич", "Иванович", "Игоревич", "Михайлович",
    "Николаевич", "Павлович", "Сергеевич",
  ],
};

const FEMALE_NAMES: NameTable = NameTable {
  first:  &[
    "Анна", "Валентина", "Галина", "Дарья", "Екатерина", "Елена",
    "Ирина", "Ксения", "Людмила", "Мария", "Наталья", "Ольга",
    "Светлана", "Татьяна", "Юлия", "Вера",
  ],
  last:   &[
    "Иванова", "Смирнова", "Кузнецова", "Попова", "Васильева", "Петрова",
    "Соколова", "Михайлова", "Новикова", "Фёдорова", "Морозова", "Волкова",
    "Алексеева", "Лебедева", "Семёнова", "Егорова",
  ],
  middle: &[
    "Александровна", "Алексеевна", "Андреевна", "Борисовна",
    "Владимировна", "Дмитриевна", "Ивановна", "Игоревна", "Михайловна",
    "Николаевна", "Павловна", "Сергеевна",
  ],
};

fn names_for(gender: Gender) -> &'static NameTable {
  match gender {
    Gender::Male => &MALE_NAMES,
    Gender::Female => &FEMALE_NAMES,
  }
}

// ─── Random provider ─────────────────────────────────────────────────────────

/// Uniform random patients. Ids are drawn from the same generator, so a
/// seeded provider is fully reproducible.
pub struct RandomSeedProvider<R = StdRng> {
  rng: R,
}

impl RandomSeedProvider<StdRng> {
  pub fn from_entropy() -> Self { Self::new(StdRng::from_entropy()) }

  pub fn seeded(seed: u64) -> Self { Self::new(StdRng::seed_from_u64(seed)) }
}

impl<R: Rng> RandomSeedProvider<R> {
  pub fn new(rng: R) -> Self { Self { rng } }

  fn patient(&mut self, today: NaiveDate) -> Patient {
    let gender = if self.rng.gen_bool(0.5) { Gender::Male } else { Gender::Female };
    let names = names_for(gender);
    let mut pick = |list: &'static [&'static str]| {
      list.choose(&mut self.rng).copied().unwrap_or_default().to_owned()
    };
    let last_name = pick(names.last);
    let first_name = pick(names.first);
    let middle_name = pick(names.middle);

    let birth_date = self.birth_date(today);
    let height = f64::from(self.rng.gen_range(SEED_HEIGHT_CM.0..=SEED_HEIGHT_CM.1));
    let weight = f64::from(self.rng.gen_range(SEED_WEIGHT_KG.0..=SEED_WEIGHT_KG.1));
    let id = uuid::Builder::from_random_bytes(self.rng.r#gen()).into_uuid();

    Patient::with_id(
      PatientId::from(id.hyphenated().to_string()),
      PatientDetails {
        last_name,
        first_name,
        middle_name,
        gender,
        birth_date,
        height,
        weight,
      },
    )
  }

  /// Uniform over the birth dates that give an age in
  /// [`MIN_SEED_AGE`]..=[`MAX_SEED_AGE`] on `today`.
  fn birth_date(&mut self, today: NaiveDate) -> NaiveDate {
    let Some((oldest, youngest)) = birth_date_range(today) else {
      return today;
    };
    let span = (youngest - oldest).num_days().max(0) as u64;
    let offset = self.rng.gen_range(0..=span);
    oldest.checked_add_days(Days::new(offset)).unwrap_or(youngest)
  }
}

fn birth_date_range(today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
  let youngest = today.checked_sub_months(Months::new(MIN_SEED_AGE * 12))?;
  let oldest = today
    .checked_sub_months(Months::new((MAX_SEED_AGE + 1) * 12))?
    .checked_add_days(Days::new(1))?;
  Some((oldest, youngest))
}

impl<R: Rng> SeedProvider for RandomSeedProvider<R> {
  fn generate(&mut self, count: usize, today: NaiveDate) -> Vec<Patient> {
    let patients: Vec<Patient> = (0..count).map(|_| self.patient(today)).collect();
    tracing::debug!(count, "generated synthetic patients");
    patients
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::validate::check_birth_date;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 2, 29).unwrap() }

  #[test]
  fn generates_requested_count() {
    let mut seeds = RandomSeedProvider::seeded(1);
    assert_eq!(seeds.generate(15, today()).len(), 15);
    assert!(seeds.generate(0, today()).is_empty());
  }

  #[test]
  fn generated_patients_are_valid() {
    let mut seeds = RandomSeedProvider::seeded(7);
    for p in seeds.generate(500, today()) {
      let d = p.details();
      let age = p.age_on(today());
      assert!((18..=90).contains(&age), "age {age}");
      assert!(check_birth_date(d.birth_date, today()).is_ok());
      assert!((150.0..=200.0).contains(&d.height));
      assert!((50.0..=120.0).contains(&d.weight));

      let names = names_for(d.gender);
      assert!(names.first.contains(&d.first_name.as_str()));
      assert!(names.last.contains(&d.last_name.as_str()));
      assert!(names.middle.contains(&d.middle_name.as_str()));
    }
  }

  #[test]
  fn both_genders_and_age_extremes_appear() {
    let mut seeds = RandomSeedProvider::seeded(42);
    let patients = seeds.generate(2_000, today());
    assert!(patients.iter().any(|p| p.gender() == Gender::Male));
    assert!(patients.iter().any(|p| p.gender() == Gender::Female));
    let ages: Vec<_> = patients.iter().map(|p| p.age_on(today())).collect();
    assert!(ages.iter().any(|&a| a < 25));
    assert!(ages.iter().any(|&a| a > 80));
  }

  #[test]
  fn seeded_provider_is_reproducible() {
    let a = RandomSeedProvider::seeded(99).generate(10, today());
    let b = RandomSeedProvider::seeded(99).generate(10, today());
    assert_eq!(a, b);
    let ids: std::collections::HashSet<_> = a.iter().map(|p| p.id().clone()).collect();
    assert_eq!(ids.len(), 10);
  }

  #[test]
  fn range_edges_give_boundary_ages() {
    let (oldest, youngest) = birth_date_range(today()).unwrap();
    assert_eq!(crate::patient::age_on(oldest, today()), 90);
    assert_eq!(crate::patient::age_on(youngest, today()), 18);
  }
}
