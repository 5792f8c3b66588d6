//! File-backed equivalence store.
//!
//! One registry file holds the whole collection as a JSON document:
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "records": [ ... ]
//! }
//! ```
//!
//! Every successful write persists the full collection via atomic write
//! (temp file + `sync_all` + rename). The store remembers the SHA-256 of
//! the file it last read or wrote; a save that finds a different hash on
//! disk fails with `ExternalModification` instead of clobbering the other
//! writer's records. That is how the racing-first-registration conflict
//! reaches the caller, who re-opens and retries the registration as a
//! merge.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use cups_core::store::{EquivalenceStore, RecordQuery, StoreError};
use cups_model::EquivalenceRecord;

use crate::error::{PersistenceError, Result};
use crate::hash::sha256_hex;

/// Current registry file schema version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// On-disk document shape.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryDocument {
    schema_version: u32,
    records: Vec<EquivalenceRecord>,
}

/// Minimal probe for the version gate, parsed before the full document.
#[derive(Debug, Deserialize)]
struct VersionProbe {
    schema_version: u32,
}

/// JSON-file-backed store keyed uniquely by principal code.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    records: BTreeMap<String, EquivalenceRecord>,
    /// SHA-256 of the file as last read or written; `None` while the
    /// file does not exist yet.
    disk_hash: Option<String>,
}

impl JsonStore {
    /// Open a registry file, loading all records.
    ///
    /// A missing file is not an error: the store starts empty and the
    /// file is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "registry file absent, starting empty");
                return Ok(Self {
                    path,
                    records: BTreeMap::new(),
                    disk_hash: None,
                });
            }
            Err(e) => return Err(PersistenceError::io("read", path, e)),
        };

        let document = parse_document(&bytes, &path)?;
        let mut records = BTreeMap::new();
        for record in document.records {
            let principal = record.principal_code.clone();
            if records.insert(principal.clone(), record).is_some() {
                return Err(PersistenceError::InvalidFormat {
                    path,
                    reason: format!("duplicate principal code '{principal}'"),
                });
            }
        }

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "loaded equivalence registry"
        );
        Ok(Self {
            path,
            records,
            disk_hash: Some(sha256_hex(&bytes)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
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

    /// Persist the full collection atomically.
    fn save(&mut self) -> Result<()> {
        self.check_external_modification()?;

        let document = RegistryDocument {
            schema_version: CURRENT_SCHEMA_VERSION,
            records: self.records.values().cloned().collect(),
        };
        let mut bytes = serde_json::to_vec_pretty(&document)
            .map_err(|source| PersistenceError::Serialization { source })?;
        bytes.push(b'\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| PersistenceError::io("create directory for", parent, e))?;
        }

        // Write to a temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&temp_path)
            .map_err(|e| PersistenceError::io("create", temp_path.clone(), e))?;
        file.write_all(&bytes)
            .map_err(|e| PersistenceError::io("write", temp_path.clone(), e))?;
        file.sync_all()
            .map_err(|e| PersistenceError::io("sync", temp_path.clone(), e))?;

        fs::rename(&temp_path, &self.path).map_err(|e| PersistenceError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: self.path.clone(),
            source: e,
        })?;

        self.disk_hash = Some(sha256_hex(&bytes));
        tracing::debug!(
            path = %self.path.display(),
            records = self.records.len(),
            "saved equivalence registry"
        );
        Ok(())
    }

    fn check_external_modification(&self) -> Result<()> {
        let current = match fs::read(&self.path) {
            Ok(bytes) => Some(sha256_hex(&bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(PersistenceError::io("read", self.path.clone(), e)),
        };
        if current != self.disk_hash {
            return Err(PersistenceError::ExternalModification {
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}

impl EquivalenceStore for JsonStore {
    fn find_one(
        &self,
        query: &RecordQuery,
    ) -> std::result::Result<Option<EquivalenceRecord>, StoreError> {
        Ok(self.records.values().find(|r| query.matches(r)).cloned())
    }

    fn insert(
        &mut self,
        mut record: EquivalenceRecord,
    ) -> std::result::Result<EquivalenceRecord, StoreError> {
        if self.records.contains_key(&record.principal_code) {
            return Err(StoreError::DuplicatePrincipal {
                code: record.principal_code,
            });
        }
        let now = Utc::now();
        record.created_at = now;
        record.updated_at = now;

        let key = record.principal_code.clone();
        self.records.insert(key.clone(), record.clone());
        if let Err(e) = self.save() {
            // Leave memory consistent with disk
            self.records.remove(&key);
            return Err(e.into());
        }
        Ok(record)
    }

    fn update(
        &mut self,
        mut record: EquivalenceRecord,
    ) -> std::result::Result<EquivalenceRecord, StoreError> {
        let Some(existing) = self.records.get(&record.principal_code) else {
            return Err(StoreError::MissingRecord {
                code: record.principal_code,
            });
        };
        record.created_at = existing.created_at;
        record.updated_at = Utc::now();

        let key = record.principal_code.clone();
        let previous = self.records.insert(key.clone(), record.clone());
        if let Err(e) = self.save() {
            if let Some(previous) = previous {
                self.records.insert(key, previous);
            }
            return Err(e.into());
        }
        Ok(record)
    }
}

fn parse_document(bytes: &[u8], path: &Path) -> Result<RegistryDocument> {
    let probe: VersionProbe =
        serde_json::from_slice(bytes).map_err(|e| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("not a registry document: {e}"),
        })?;

    if probe.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: probe.schema_version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    serde_json::from_slice(bytes).map_err(|source| PersistenceError::Deserialization {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use tempfile::tempdir;

    use super::*;

    fn record(principal: &str) -> EquivalenceRecord {
        EquivalenceRecord::new(principal, BTreeSet::new(), "Procedimiento")
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("registry.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let mut store = JsonStore::open(&path).unwrap();
        store.insert(record("890201")).unwrap();

        assert!(path.exists());
        let bytes = fs::read(&path).unwrap();
        let document: RegistryDocument = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(document.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(document.records.len(), 1);
    }

    #[test]
    fn test_load_invalid_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");
        fs::write(&path, b"not json at all").unwrap();

        let result = JsonStore::open(&path);
        assert!(matches!(result, Err(PersistenceError::InvalidFormat { .. })));
    }

    #[test]
    fn test_load_unsupported_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");
        fs::write(&path, br#"{"schema_version": 999, "records": []}"#).unwrap();

        let result = JsonStore::open(&path);
        assert!(matches!(
            result,
            Err(PersistenceError::UnsupportedVersion { found: 999, .. })
        ));
    }

    #[test]
    fn test_load_rejects_duplicate_principal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let mut store = JsonStore::open(&path).unwrap();
        let stored = store.insert(record("890201")).unwrap();

        let mut document = RegistryDocument {
            schema_version: CURRENT_SCHEMA_VERSION,
            records: vec![stored.clone(), stored],
        };
        document.records[1].description = "duplicada".to_string();
        fs::write(&path, serde_json::to_vec(&document).unwrap()).unwrap();

        let result = JsonStore::open(&path);
        assert!(matches!(result, Err(PersistenceError::InvalidFormat { .. })));
    }
}
