//! Equivalence record model.
//!
//! A CUPS procedure code arrives from upstream systems in many textual
//! shapes: with or without leading zeros, with dots, dashes, or spaces as
//! group separators, at 6-digit or 10-digit length. An
//! [`EquivalenceRecord`] ties one canonical code (the *principal code*) to
//! every textual variant known to denote the same procedure.
//!
//! ## Invariants
//!
//! - `principal_code` is immutable once created and unique across records.
//! - `variants` always contains `principal_code` itself.
//! - Variants are only ever added, never removed; merges are set unions.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance tag for records created by the equivalence generator itself
/// (as opposed to mappings curated from an upstream registry or import).
pub const SYSTEM_SOURCE: &str = "Sistema";

/// A persisted mapping from a canonical CUPS code to its textual variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceRecord {
    /// Canonical code keying this record (e.g., "890201").
    /// Natural key: exactly one active record may exist per principal code.
    pub principal_code: String,

    /// Every textual representation known to denote `principal_code`,
    /// including `principal_code` itself.
    pub variants: BTreeSet<String>,

    /// Human-readable procedure description. Required, non-empty.
    pub description: String,

    /// Where the equivalence mapping originated (e.g., [`SYSTEM_SOURCE`],
    /// an import file name). May be empty.
    pub sources: BTreeSet<String>,

    /// Inactive records are excluded from lookup.
    pub active: bool,

    /// Set by the store on insert.
    pub created_at: DateTime<Utc>,

    /// Set by the store on insert and every update.
    pub updated_at: DateTime<Utc>,
}

impl EquivalenceRecord {
    /// Create a new active record.
    ///
    /// The principal code is inserted into `variants` if missing, and
    /// `sources` starts as `{SYSTEM_SOURCE}`. Timestamps are provisional;
    /// the store stamps authoritative values on insert.
    pub fn new(
        principal_code: impl Into<String>,
        variants: BTreeSet<String>,
        description: impl Into<String>,
    ) -> Self {
        let principal_code = principal_code.into();
        let mut variants = variants;
        variants.insert(principal_code.clone());
        let now = Utc::now();
        Self {
            principal_code,
            variants,
            description: description.into(),
            sources: BTreeSet::from([SYSTEM_SOURCE.to_string()]),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge additional variants into this record (set union).
    ///
    /// Returns how many variants were actually new. Never removes or
    /// rewrites an existing variant.
    pub fn merge_variants<'a, I>(&mut self, additional: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let before = self.variants.len();
        self.variants
            .extend(additional.into_iter().map(String::from));
        self.variants.len() - before
    }

    /// Whether `value` is a known variant of this record (exact match).
    pub fn has_variant(&self, value: &str) -> bool {
        self.variants.contains(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_contains_principal_variant() {
        let record = EquivalenceRecord::new("890201", BTreeSet::new(), "Electrocardiograma");
        assert!(record.has_variant("890201"));
        assert!(record.active);
        assert!(record.sources.contains(SYSTEM_SOURCE));
    }

    #[test]
    fn merge_counts_only_new_variants() {
        let mut record = EquivalenceRecord::new(
            "890201",
            BTreeSet::from(["89.02.01".to_string()]),
            "Electrocardiograma",
        );
        let added = record.merge_variants(["89.02.01", "89-02-01"]);
        assert_eq!(added, 1);
        assert!(record.has_variant("89-02-01"));
    }
}
