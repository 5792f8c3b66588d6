//! Store seam for equivalence records.
//!
//! The registry is constructed with an explicit store so callers choose
//! durability and tests substitute [`MemoryStore`]. The contract is three
//! operations over one logical collection keyed uniquely by principal
//! code: `find_one`, `insert`, `update`. Stores assign the authoritative
//! `created_at`/`updated_at` timestamps.
//!
//! Stores scan records in ascending principal-code order, so a variant
//! shared by two records (possible; membership is not globally unique)
//! always resolves to the same record: first match wins.

use std::collections::BTreeMap;

use chrono::Utc;
use thiserror::Error;

use cups_model::EquivalenceRecord;

/// Typed predicate for [`EquivalenceStore::find_one`].
#[derive(Debug, Clone)]
pub enum RecordQuery {
    /// Exact principal-code match, regardless of the active flag.
    ByPrincipal(String),

    /// First *active* record whose principal code equals `canonical`, or
    /// whose variant set contains `raw` or `canonical` exactly (no
    /// re-normalization of stored variants).
    ActiveMatch { canonical: String, raw: String },
}

impl RecordQuery {
    /// Whether `record` satisfies this predicate.
    pub fn matches(&self, record: &EquivalenceRecord) -> bool {
        match self {
            Self::ByPrincipal(code) => record.principal_code == *code,
            Self::ActiveMatch { canonical, raw } => {
                record.active
                    && (record.principal_code == *canonical
                        || record.has_variant(raw)
                        || record.has_variant(canonical))
            }
        }
    }
}

/// Failure in the persistence layer backing a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The unique index over principal codes rejected an insert. Under
    /// concurrent first registration of the same code the losing caller
    /// sees this; retrying `register_or_merge` turns it into a merge.
    #[error("a record with principal code '{code}' already exists")]
    DuplicatePrincipal { code: String },

    /// Update targeted a principal code with no stored record.
    #[error("no record with principal code '{code}' to update")]
    MissingRecord { code: String },

    /// The backend itself failed (I/O, serialization, lost connection).
    #[error("storage backend failure")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Single-collection record store keyed uniquely by principal code.
pub trait EquivalenceStore {
    /// Return the first record matching `query`, if any.
    fn find_one(&self, query: &RecordQuery) -> Result<Option<EquivalenceRecord>>;

    /// Persist a new record, stamping `created_at`/`updated_at`.
    /// Fails with [`StoreError::DuplicatePrincipal`] if the principal
    /// code is already present.
    fn insert(&mut self, record: EquivalenceRecord) -> Result<EquivalenceRecord>;

    /// Persist changes to an existing record, stamping `updated_at` and
    /// preserving the stored `created_at`.
    fn update(&mut self, record: EquivalenceRecord) -> Result<EquivalenceRecord>;
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, EquivalenceRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in ascending principal-code order.
    pub fn records(&self) -> impl Iterator<Item = &EquivalenceRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl EquivalenceStore for MemoryStore {
    fn find_one(&self, query: &RecordQuery) -> Result<Option<EquivalenceRecord>> {
        Ok(self.records.values().find(|r| query.matches(r)).cloned())
    }

    fn insert(&mut self, mut record: EquivalenceRecord) -> Result<EquivalenceRecord> {
        if self.records.contains_key(&record.principal_code) {
            return Err(StoreError::DuplicatePrincipal {
                code: record.principal_code,
            });
        }
        let now = Utc::now();
        record.created_at = now;
        record.updated_at = now;
        self.records
            .insert(record.principal_code.clone(), record.clone());
        Ok(record)
    }

    fn update(&mut self, mut record: EquivalenceRecord) -> Result<EquivalenceRecord> {
        let Some(existing) = self.records.get(&record.principal_code) else {
            return Err(StoreError::MissingRecord {
                code: record.principal_code,
            });
        };
        record.created_at = existing.created_at;
        record.updated_at = Utc::now();
        self.records
            .insert(record.principal_code.clone(), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn record(principal: &str) -> EquivalenceRecord {
        EquivalenceRecord::new(principal, BTreeSet::new(), "Procedimiento")
    }

    #[test]
    fn test_insert_rejects_duplicate_principal() {
        let mut store = MemoryStore::new();
        store.insert(record("890201")).expect("first insert");

        let result = store.insert(record("890201"));
        assert!(matches!(
            result,
            Err(StoreError::DuplicatePrincipal { code }) if code == "890201"
        ));
    }

    #[test]
    fn test_update_requires_existing_record() {
        let mut store = MemoryStore::new();
        let result = store.update(record("890201"));
        assert!(matches!(result, Err(StoreError::MissingRecord { .. })));
    }

    #[test]
    fn test_update_preserves_created_at() {
        let mut store = MemoryStore::new();
        let created = store.insert(record("890201")).expect("insert");

        let mut changed = created.clone();
        changed.merge_variants(["89-02-01"]);
        let updated = store.update(changed).expect("update");

        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn test_active_match_skips_inactive_records() {
        let mut store = MemoryStore::new();
        let mut rec = record("890201");
        rec.active = false;
        store.insert(rec).expect("insert");

        let query = RecordQuery::ActiveMatch {
            canonical: "890201".to_string(),
            raw: "890201".to_string(),
        };
        assert!(store.find_one(&query).expect("find").is_none());

        // The exact-key query still sees it
        let by_principal = RecordQuery::ByPrincipal("890201".to_string());
        assert!(store.find_one(&by_principal).expect("find").is_some());
    }

    #[test]
    fn test_first_match_order_is_by_principal_code() {
        let mut store = MemoryStore::new();
        let mut a = record("100000");
        a.merge_variants(["SHARED"]);
        let mut b = record("200000");
        b.merge_variants(["SHARED"]);
        store.insert(b).expect("insert b");
        store.insert(a).expect("insert a");

        let query = RecordQuery::ActiveMatch {
            canonical: "SHARED".to_string(),
            raw: "SHARED".to_string(),
        };
        let found = store.find_one(&query).expect("find").expect("match");
        assert_eq!(found.principal_code, "100000");
    }
}
