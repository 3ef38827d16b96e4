//! Encoding and decoding between the patient collection and the bytes of the
//! store file.
//!
//! The file is a JSON array of flat [`PatientRecord`] objects, indented by
//! four spaces, with non-ASCII text written verbatim.

use std::collections::HashSet;

use anthropo_core::{Patient, PatientRecord};
use serde::Serialize as _;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::{Result, StoreUnreadable};

const INDENT: &[u8] = b"    ";

pub fn encode_patients(patients: &[Patient]) -> Result<Vec<u8>> {
  let records: Vec<PatientRecord> = patients.iter().map(Patient::to_record).collect();

  let mut buf = Vec::new();
  let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
  records.serialize(&mut ser)?;
  buf.push(b'\n');
  Ok(buf)
}

/// Decode every record in file order. The first bad record, or the first
/// repeated id, fails the whole file.
pub fn decode_patients(bytes: &[u8]) -> Result<Vec<Patient>, StoreUnreadable> {
  let records: Vec<PatientRecord> = serde_json::from_slice(bytes)?;
  let patients: Vec<Patient> = records
    .into_iter()
    .enumerate()
    .map(|(index, record)| {
      Patient::from_record(record).map_err(|source| StoreUnreadable::Record { index, source })
    })
    .collect::<Result<_, _>>()?;

  let repeated = {
    let mut seen = HashSet::with_capacity(patients.len());
    patients.iter().position(|p| !seen.insert(p.id()))
  };
  if let Some(index) = repeated {
    return Err(StoreUnreadable::DuplicateId { index, id: patients[index].id().clone() });
  }
  Ok(patients)
}
