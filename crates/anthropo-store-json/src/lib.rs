//! JSON file backend for the anthropo patient register.
//!
//! The whole collection lives in one UTF-8 JSON file that is rewritten on
//! every save. A missing or unreadable file is treated as a first run and
//! seeded with synthetic patients.

mod encode;
mod store;

pub mod error;

pub use error::{Error, Result, StoreUnreadable};
pub use store::{DEFAULT_SYNTHETIC_COUNT, JsonFileStore};
