#![deny(unsafe_code)]

//! Durable storage for the CUPS equivalence registry.
//!
//! Provides [`JsonStore`], a file-backed implementation of
//! `cups_core::EquivalenceStore` holding the whole collection in one
//! JSON document:
//!
//! - **Atomic writes** (temp file + rename) so a crash never leaves a
//!   half-written registry.
//! - **Schema version gate** so files from newer builds are rejected
//!   instead of misread.
//! - **Change detection** via SHA-256 of the on-disk file, surfacing
//!   racing writers as a store conflict for the caller to retry.
//!
//! # Example
//!
//! ```ignore
//! use cups_core::EquivalenceRegistry;
//! use cups_persistence::JsonStore;
//!
//! let store = JsonStore::open("cups-registry.json")?;
//! let mut registry = EquivalenceRegistry::new(store);
//! registry.register_or_merge("890201", "Electrocardiograma de ritmo")?;
//! ```

mod error;
mod hash;
mod store;

pub use error::{PersistenceError, Result};
pub use hash::sha256_hex;
pub use store::{CURRENT_SCHEMA_VERSION, JsonStore};
