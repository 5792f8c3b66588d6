#![deny(unsafe_code)]

//! Data model for the CUPS code equivalence registry.

pub mod record;

pub use record::{EquivalenceRecord, SYSTEM_SOURCE};
