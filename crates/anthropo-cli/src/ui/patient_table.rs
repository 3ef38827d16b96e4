//! Patient list table.

use anthropo_core::{BmiCategory, Gender, PatientId, patient::Patient};
use chrono::NaiveDate;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct PatientRow {
  #[tabled(rename = "Last name")]
  last_name:   String,
  #[tabled(rename = "First name")]
  first_name:  String,
  #[tabled(rename = "Middle name")]
  middle_name: String,
  #[tabled(rename = "Gender")]
  gender:      Gender,
  #[tabled(rename = "Age")]
  age:         i32,
  #[tabled(rename = "Height")]
  height:      f64,
  #[tabled(rename = "Weight")]
  weight:      f64,
  #[tabled(rename = "BMI")]
  bmi:         String,
  #[tabled(rename = "Category")]
  category:    BmiCategory,
  #[tabled(rename = "Id")]
  id:          PatientId,
}

impl PatientRow {
  fn new(p: &Patient, today: NaiveDate) -> Self {
    let d = p.details();
    Self {
      last_name:   d.last_name.clone(),
      first_name:  d.first_name.clone(),
      middle_name: d.middle_name.clone(),
      gender:      d.gender,
      age:         p.age_on(today),
      height:      d.height,
      weight:      d.weight,
      bmi:         format!("{:.2}", p.bmi()),
      category:    p.bmi_category(),
      id:          p.id().clone(),
    }
  }
}

/// One line per patient, in collection order.
pub fn render(patients: &[Patient], today: NaiveDate) -> String {
  if patients.is_empty() {
    return "No patients.\n".to_owned();
  }
  let rows = patients.iter().map(|p| PatientRow::new(p, today));
  let mut out = Table::new(rows).with(Style::blank()).to_string();
  out.push('\n');
  out
}

#[cfg(test)]
mod tests {
  use anthropo_core::PatientDetails;

  use super::*;

  fn patient(id: &str, last_name: &str) -> Patient {
    Patient::with_id(id.into(), PatientDetails {
      last_name:   last_name.into(),
      first_name:  "Ирина".into(),
      middle_name: String::new(),
      gender:      Gender::Female,
      birth_date:  NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
      height:      160.0,
      weight:      100.0,
    })
  }

  #[test]
  fn renders_derived_values() {
    let out = render(&[patient("p-1", "Морозова")], NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].trim_start().starts_with("Last name"));
    for cell in ["Морозова", "female", "34", "160", "100", "39.06", "obese", "p-1"] {
      assert!(lines[1].contains(cell), "missing {cell} in {:?}", lines[1]);
    }
  }

  #[test]
  fn columns_line_up_with_cyrillic_names() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let out = render(&[patient("p-1", "Ли"), patient("p-2", "Константинопольская")], today);
    let starts: Vec<usize> = out
      .lines()
      .map(|line| line.chars().take_while(|&c| c != 'И' && c != 'F').count())
      .collect();
    assert_eq!(starts.len(), 3);
    assert!(starts.windows(2).all(|w| w[0] == w[1]), "misaligned: {out}");
  }

  #[test]
  fn empty_list() {
    assert_eq!(render(&[], NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()), "No patients.\n");
  }
}
