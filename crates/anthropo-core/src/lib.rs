//! Core types and rules for the anthropo patient register.
//!
//! This crate is deliberately free of file-system code. It owns the patient
//! record and its derived values, input validation, the statistics behind the
//! reports, the seed-data provider, and the [`store::PatientStore`]
//! abstraction that storage backends implement.

pub mod error;
pub mod patient;
pub mod registry;
pub mod resource;
pub mod seed;
pub mod stats;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
pub use patient::{BmiCategory, Gender, Patient, PatientDetails, PatientId, PatientRecord};
pub use registry::Registry;
pub use resource::{BaseDirResolver, ResourceResolver};
pub use seed::{RandomSeedProvider, SeedProvider};
pub use store::PatientStore;
