//! Descriptive statistics over a patient collection.
//!
//! Each function computes the data behind one report: gender ratio, age
//! histogram, BMI distribution by gender, and BMI against age with a linear
//! trend. Rendering is left to the caller.

use chrono::NaiveDate;
use serde::Serialize;

use crate::patient::{Gender, Patient};

pub const DEFAULT_AGE_BINS: usize = 10;

/// Whisker reach as a multiple of the interquartile range.
const WHISKER_IQR: f64 = 1.5;

// ─── Gender ratio ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderRatio {
  pub male:   usize,
  pub female: usize,
}

impl GenderRatio {
  pub fn total(&self) -> usize { self.male + self.female }

  pub fn male_percent(&self) -> f64 { percent(self.male, self.total()) }

  pub fn female_percent(&self) -> f64 { percent(self.female, self.total()) }
}

fn percent(part: usize, total: usize) -> f64 {
  if total == 0 {
    0.0
  } else {
    part as f64 * 100.0 / total as f64
  }
}

pub fn gender_ratio(patients: &[Patient]) -> GenderRatio {
  patients
    .iter()
    .fold(GenderRatio::default(), |mut acc, p| {
      match p.gender() {
        Gender::Male => acc.male += 1,
        Gender::Female => acc.female += 1,
      }
      acc
    })
}

// ─── Age histogram ───────────────────────────────────────────────────────────

/// One histogram interval. `[lower, upper)` except for the last bin, which
/// also includes `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
  pub lower: f64,
  pub upper: f64,
  pub count: usize,
}

/// Split ages into `bins` equal-width intervals spanning the observed range.
///
/// When every age is the same the range is widened to `age ± 0.5`. Empty
/// input or zero bins gives an empty histogram.
pub fn age_histogram(patients: &[Patient], today: NaiveDate, bins: usize) -> Vec<HistogramBin> {
  let ages: Vec<f64> = patients.iter().map(|p| f64::from(p.age_on(today))).collect();
  histogram(&ages, bins)
}

fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
  let Some((mut lo, mut hi)) = min_max(values) else {
    return Vec::new();
  };
  if bins == 0 {
    return Vec::new();
  }
  if lo == hi {
    lo -= 0.5;
    hi += 0.5;
  }

  let width = (hi - lo) / bins as f64;
  let mut out: Vec<HistogramBin> = (0..bins)
    .map(|i| HistogramBin {
      lower: lo + width * i as f64,
      upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
      count: 0,
    })
    .collect();

  for &v in values {
    let idx = (((v - lo) / width) as usize).min(bins - 1);
    out[idx].count += 1;
  }
  out
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
  values.iter().copied().fold(None, |acc, v| match acc {
    None => Some((v, v)),
    Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
  })
}

// ─── BMI by gender ───────────────────────────────────────────────────────────

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
  pub count:        usize,
  pub min:          f64,
  pub q1:           f64,
  pub median:       f64,
  pub q3:           f64,
  pub max:          f64,
  /// Smallest value not below `q1 - 1.5 * IQR`.
  pub whisker_low:  f64,
  /// Largest value not above `q3 + 1.5 * IQR`.
  pub whisker_high: f64,
  /// Values outside the whiskers, ascending.
  pub outliers:     Vec<f64>,
}

impl BoxSummary {
  /// `None` for an empty sample.
  pub fn from_values(values: &[f64]) -> Option<Self> {
    if values.is_empty() {
      return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let reach = WHISKER_IQR * (q3 - q1);
    let (fence_low, fence_high) = (q1 - reach, q3 + reach);

    let within = |v: &f64| (fence_low..=fence_high).contains(v);
    let whisker_low = sorted.iter().copied().find(within).unwrap_or(q1);
    let whisker_high = sorted.iter().copied().rev().find(within).unwrap_or(q3);
    let outliers = sorted.iter().copied().filter(|v| !within(v)).collect();

    Some(Self {
      count: sorted.len(),
      min: sorted[0],
      q1,
      median,
      q3,
      max: sorted[sorted.len() - 1],
      whisker_low,
      whisker_high,
      outliers,
    })
  }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
  let pos = q * (sorted.len() - 1) as f64;
  let below = pos.floor() as usize;
  let above = pos.ceil() as usize;
  let frac = pos - below as f64;
  sorted[below] + (sorted[above] - sorted[below]) * frac
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiByGender {
  pub male:   Option<BoxSummary>,
  pub female: Option<BoxSummary>,
}

pub fn bmi_by_gender(patients: &[Patient]) -> BmiByGender {
  let of = |gender: Gender| {
    let bmis: Vec<f64> = patients
      .iter()
      .filter(|p| p.gender() == gender)
      .map(Patient::bmi)
      .collect();
    BoxSummary::from_values(&bmis)
  };
  BmiByGender {
    male:   of(Gender::Male),
    female: of(Gender::Female),
  }
}

// ─── BMI vs age ──────────────────────────────────────────────────────────────

/// Least-squares line `bmi = slope * age + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
  pub slope:     f64,
  pub intercept: f64,
}

impl Trend {
  pub fn at(&self, age: f64) -> f64 { self.slope * age + self.intercept }

  /// `None` for fewer than two points or when every x is the same.
  pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
    if points.len() < 2 {
      return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), &(x, y)| {
      let dx = x - mean_x;
      (sxy + dx * (y - mean_y), sxx + dx * dx)
    });
    if sxx == 0.0 {
      return None;
    }
    let slope = sxy / sxx;
    Some(Self { slope, intercept: mean_y - slope * mean_x })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeBmiPoint {
  pub age: i32,
  pub bmi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiVsAge {
  pub points: Vec<AgeBmiPoint>,
  pub trend:  Option<Trend>,
}

pub fn bmi_vs_age(patients: &[Patient], today: NaiveDate) -> BmiVsAge {
  let points: Vec<AgeBmiPoint> = patients
    .iter()
    .map(|p| AgeBmiPoint { age: p.age_on(today), bmi: p.bmi() })
    .collect();
  let xy: Vec<(f64, f64)> = points.iter().map(|p| (f64::from(p.age), p.bmi)).collect();
  BmiVsAge { trend: Trend::fit(&xy), points }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// All four statistics computed together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
  pub as_of:         NaiveDate,
  pub gender_ratio:  GenderRatio,
  pub age_histogram: Vec<HistogramBin>,
  pub bmi_by_gender: BmiByGender,
  pub bmi_vs_age:    BmiVsAge,
}

impl Report {
  pub fn compute(patients: &[Patient], today: NaiveDate, bins: usize) -> Self {
    Self {
      as_of:         today,
      gender_ratio:  gender_ratio(patients),
      age_histogram: age_histogram(patients, today, bins),
      bmi_by_gender: bmi_by_gender(patients),
      bmi_vs_age:    bmi_vs_age(patients, today),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::patient::PatientDetails;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() }

  fn patient(gender: Gender, birth_year: i32, height: f64, weight: f64) -> Patient {
    Patient::new(PatientDetails {
      last_name: "Test".into(),
      first_name: "Test".into(),
      middle_name: String::new(),
      gender,
      birth_date: NaiveDate::from_ymd_opt(birth_year, 1, 1).unwrap(),
      height,
      weight,
    })
  }

  #[test]
  fn ratio_counts_and_percentages() {
    let ps = vec![
      patient(Gender::Male, 1990, 180.0, 80.0),
      patient(Gender::Female, 1980, 165.0, 60.0),
      patient(Gender::Female, 1970, 160.0, 70.0),
      patient(Gender::Female, 1960, 170.0, 65.0),
    ];
    let r = gender_ratio(&ps);
    assert_eq!(r, GenderRatio { male: 1, female: 3 });
    assert_eq!(r.male_percent(), 25.0);
    assert_eq!(r.female_percent(), 75.0);
    assert_eq!(gender_ratio(&[]).male_percent(), 0.0);
  }

  #[test]
  fn histogram_spans_range_and_closes_last_bin() {
    // Ages 20, 30, 40, 50, 60 on 2024-01-01.
    let ps: Vec<_> = [2004, 1994, 1984, 1974, 1964]
      .into_iter()
      .map(|y| patient(Gender::Male, y, 175.0, 70.0))
      .collect();
    let bins = age_histogram(&ps, today(), 4);
    assert_eq!(bins.len(), 4);
    assert_eq!(bins[0].lower, 20.0);
    assert_eq!(bins[3].upper, 60.0);
    let counts: Vec<_> = bins.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![1, 1, 1, 2]);
    assert_eq!(counts.iter().sum::<usize>(), ps.len());
  }

  #[test]
  fn histogram_of_identical_ages_widens() {
    let ps = vec![patient(Gender::Male, 1994, 175.0, 70.0); 3];
    let bins = age_histogram(&ps, today(), 10);
    assert_eq!(bins[0].lower, 29.5);
    assert_eq!(bins[9].upper, 30.5);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    assert!(age_histogram(&[], today(), 10).is_empty());
  }

  #[test]
  fn box_summary_quartiles_and_outliers() {
    let s = BoxSummary::from_values(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
    assert_eq!(s.count, 5);
    assert_eq!(s.q1, 2.0);
    assert_eq!(s.median, 3.0);
    assert_eq!(s.q3, 4.0);
    assert_eq!(s.min, 1.0);
    assert_eq!(s.max, 100.0);
    assert_eq!(s.whisker_low, 1.0);
    assert_eq!(s.whisker_high, 4.0);
    assert_eq!(s.outliers, vec![100.0]);

    let even = BoxSummary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
    assert_eq!(even.median, 2.5);
    assert_eq!(even.q1, 1.75);
    assert!(BoxSummary::from_values(&[]).is_none());
  }

  #[test]
  fn bmi_split_by_gender() {
    let ps = vec![
      patient(Gender::Male, 1990, 180.0, 75.0),
      patient(Gender::Male, 1990, 180.0, 50.0),
    ];
    let b = bmi_by_gender(&ps);
    assert!(b.female.is_none());
    let male = b.male.unwrap();
    assert_eq!(male.min, 15.43);
    assert_eq!(male.max, 23.15);
  }

  #[test]
  fn trend_fits_a_line() {
    let t = Trend::fit(&[(20.0, 21.0), (40.0, 25.0), (60.0, 29.0)]).unwrap();
    assert!((t.slope - 0.2).abs() < 1e-9);
    assert!((t.intercept - 17.0).abs() < 1e-9);
    assert!((t.at(50.0) - 27.0).abs() < 1e-9);

    assert!(Trend::fit(&[(30.0, 20.0)]).is_none());
    assert!(Trend::fit(&[(30.0, 20.0), (30.0, 25.0)]).is_none());
  }

  #[test]
  fn bmi_vs_age_points_follow_patients() {
    let ps = vec![
      patient(Gender::Male, 1994, 180.0, 75.0),
      patient(Gender::Female, 1964, 160.0, 100.0),
    ];
    let v = bmi_vs_age(&ps, today());
    assert_eq!(v.points, vec![
      AgeBmiPoint { age: 30, bmi: 23.15 },
      AgeBmiPoint { age: 60, bmi: 39.06 },
    ]);
    assert!(v.trend.is_some());
  }

  #[test]
  fn report_serializes() {
    let ps = vec![patient(Gender::Male, 1994, 180.0, 75.0)];
    let report = Report::compute(&ps, today(), DEFAULT_AGE_BINS);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["gender_ratio"]["male"], 1);
    assert_eq!(json["age_histogram"].as_array().unwrap().len(), DEFAULT_AGE_BINS);
  }
}
