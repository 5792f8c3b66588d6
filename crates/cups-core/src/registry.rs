//! The equivalence registry: lookup-by-any-variant and create-or-merge.

use tracing::{debug, info};

use cups_model::EquivalenceRecord;

use crate::error::{RegistryError, Result};
use crate::normalize::normalize;
use crate::store::{EquivalenceStore, RecordQuery};
use crate::variants::generate_variants;

/// Stateful front for the persisted equivalence collection.
///
/// Constructed with an explicit store; see
/// [`MemoryStore`](crate::store::MemoryStore) for tests and embedding, or
/// a durable implementation for production use.
#[derive(Debug)]
pub struct EquivalenceRegistry<S> {
    store: S,
}

impl<S: EquivalenceStore> EquivalenceRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Resolve a raw code string to its equivalence record.
    ///
    /// The raw input is canonicalized and the store is queried for an
    /// active record keyed by the canonical code or carrying the raw or
    /// canonical string in its variant set. Matching against both forms
    /// lets lookups succeed for manually curated variants the generator
    /// never produced, as long as some record carries them.
    ///
    /// `Ok(None)` is the expected miss outcome, not an error.
    pub fn resolve(&self, raw_code: &str) -> Result<Option<EquivalenceRecord>> {
        let canonical = normalize(raw_code);
        let query = RecordQuery::ActiveMatch {
            canonical: canonical.clone(),
            raw: raw_code.to_string(),
        };
        let found = self.store.find_one(&query)?;
        match &found {
            Some(record) => {
                debug!(code = %raw_code, principal = %record.principal_code, "resolved code");
            }
            None => {
                debug!(code = %raw_code, canonical = %canonical, "no active record matches");
            }
        }
        Ok(found)
    }

    /// Register a code, or merge its generated variants into the record
    /// that already carries it.
    ///
    /// The principal-code lookup is exact; callers pass the intended
    /// canonical key. On merge the existing description, sources, and
    /// principal code are left untouched and no variant is ever removed.
    /// One store read followed by exactly one write.
    ///
    /// # Errors
    ///
    /// [`RegistryError::EmptyDescription`] when `description` is blank;
    /// store failures propagate, including the duplicate-principal
    /// conflict two racing first registrations can produce (the loser
    /// retries and merges — this registry does not retry itself).
    pub fn register_or_merge(
        &mut self,
        principal_code: &str,
        description: &str,
    ) -> Result<EquivalenceRecord> {
        if description.trim().is_empty() {
            return Err(RegistryError::EmptyDescription);
        }

        let variants = generate_variants(principal_code);
        let query = RecordQuery::ByPrincipal(principal_code.to_string());

        match self.store.find_one(&query)? {
            Some(mut record) => {
                let added = record.merge_variants(variants.iter().map(String::as_str));
                let updated = self.store.update(record)?;
                info!(
                    principal = %updated.principal_code,
                    added,
                    total = updated.variants.len(),
                    "merged generated variants into existing record"
                );
                Ok(updated)
            }
            None => {
                let record = EquivalenceRecord::new(principal_code, variants, description);
                let created = self.store.insert(record)?;
                info!(
                    principal = %created.principal_code,
                    variants = created.variants.len(),
                    "registered new equivalence record"
                );
                Ok(created)
            }
        }
    }
}
