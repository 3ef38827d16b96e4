//! Plain-text rendering of the patient list and the statistics report.

pub mod patient_table;
pub mod report;

pub use patient_table::render as render_patients;
pub use report::render as render_report;
