#![deny(unsafe_code)]

//! CUPS code equivalence resolution.
//!
//! Procedure codes arrive from hospital systems, government registries,
//! and claim documents in inconsistent textual formats; this crate
//! recognizes that `"890201"`, `"0000890201"`, `"89.02.01"`, and
//! `"89-02-01"` denote the same procedure. Three components, each
//! depending only on the one before it:
//!
//! 1. [`normalize`] — raw code string to canonical string.
//! 2. [`generate_variants`] — canonical code to its complete set of
//!    known textual variants.
//! 3. [`EquivalenceRegistry`] — persisted records associating a
//!    canonical code with its variant set; lookup-by-any-variant and
//!    create-or-merge over an [`EquivalenceStore`].
//!
//! # Example
//!
//! ```
//! use cups_core::{EquivalenceRegistry, MemoryStore};
//!
//! let mut registry = EquivalenceRegistry::new(MemoryStore::new());
//! registry
//!     .register_or_merge("890201", "Electrocardiograma de ritmo")
//!     .unwrap();
//!
//! let record = registry.resolve("89.02.01").unwrap().expect("registered");
//! assert_eq!(record.principal_code, "890201");
//! ```

pub mod error;
pub mod normalize;
pub mod registry;
pub mod store;
pub mod variants;

pub use error::{RegistryError, Result};
pub use normalize::normalize;
pub use registry::EquivalenceRegistry;
pub use store::{EquivalenceStore, MemoryStore, RecordQuery, StoreError};
pub use variants::generate_variants;
