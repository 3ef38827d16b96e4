//! Statistics report as text: the four charts of the report, flattened.

use std::fmt::Write as _;

use anthropo_core::stats::{BoxSummary, Report};

/// Widest bar in the age histogram, in characters.
const BAR_WIDTH: usize = 40;

pub fn render(report: &Report) -> String {
  let mut out = String::new();
  write_report(&mut out, report).map(|()| out).unwrap_or_default()
}

fn write_report(out: &mut String, report: &Report) -> std::fmt::Result {
  let ratio = &report.gender_ratio;
  writeln!(out, "Patients: {} (as of {})", ratio.total(), report.as_of.format("%d-%m-%Y"))?;

  writeln!(out, "\nGender ratio")?;
  writeln!(out, "  male    {:>4}  {:5.1}%", ratio.male, ratio.male_percent())?;
  writeln!(out, "  female  {:>4}  {:5.1}%", ratio.female, ratio.female_percent())?;

  writeln!(out, "\nAge histogram")?;
  let peak = report.age_histogram.iter().map(|b| b.count).max().unwrap_or(0).max(1);
  for (i, bin) in report.age_histogram.iter().enumerate() {
    let close = if i + 1 == report.age_histogram.len() { ']' } else { ')' };
    let bar = "#".repeat(bin.count * BAR_WIDTH / peak);
    writeln!(
      out,
      "  [{:6.1}, {:6.1}{close}  {:>4}  {bar}",
      bin.lower, bin.upper, bin.count
    )?;
  }

  writeln!(out, "\nBMI by gender")?;
  write_box(out, "male", report.bmi_by_gender.male.as_ref())?;
  write_box(out, "female", report.bmi_by_gender.female.as_ref())?;

  writeln!(out, "\nBMI vs age")?;
  writeln!(out, "  points  {}", report.bmi_vs_age.points.len())?;
  match report.bmi_vs_age.trend {
    Some(t) => {
      writeln!(out, "  trend   bmi = {:.4} * age {:+.2}", t.slope, t.intercept)?;
      let ages = report.bmi_vs_age.points.iter().map(|p| p.age);
      if let (Some(young), Some(old)) = (ages.clone().min(), ages.max()) {
        writeln!(
          out,
          "  fitted  {:.2} at age {young}, {:.2} at age {old}",
          t.at(f64::from(young)),
          t.at(f64::from(old))
        )?;
      }
    }
    None => writeln!(out, "  trend   not enough distinct ages")?,
  }
  Ok(())
}

fn write_box(out: &mut String, label: &str, summary: Option<&BoxSummary>) -> std::fmt::Result {
  let Some(s) = summary else {
    return writeln!(out, "  {label:<6}  no data");
  };
  write!(
    out,
    "  {label:<6}  n={:<3} min {:.2}  q1 {:.2}  median {:.2}  q3 {:.2}  max {:.2}",
    s.count, s.min, s.q1, s.median, s.q3, s.max
  )?;
  if !s.outliers.is_empty() {
    let outliers: Vec<String> = s.outliers.iter().map(|v| format!("{v:.2}")).collect();
    write!(out, "  outliers {}", outliers.join(", "))?;
  }
  writeln!(out)
}
