//! The `PatientStore` trait.
//!
//! Implemented by storage backends (e.g. `anthropo-store-json`). The
//! [`Registry`](crate::registry::Registry) and the CLI depend on this
//! abstraction, not on any concrete backend.

use crate::patient::Patient;

/// Abstraction over a persisted patient collection.
///
/// Every write replaces the whole collection; there are no incremental
/// appends. All calls are synchronous and run to completion.
pub trait PatientStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the stored collection in stored order.
  ///
  /// Backends recover from a missing or unreadable store on their own by
  /// seeding it with [`generate_synthetic`](Self::generate_synthetic)
  /// output; only failures to persist that seed are returned.
  fn load(&mut self) -> Result<Vec<Patient>, Self::Error>;

  /// Replace the stored collection with `patients`. A reader never observes
  /// a partially written collection.
  fn save(&mut self, patients: &[Patient]) -> Result<(), Self::Error>;

  /// Produce `count` synthetic patients without persisting them.
  fn generate_synthetic(&mut self, count: usize) -> Vec<Patient>;
}
