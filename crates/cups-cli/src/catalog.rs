//! CUPS catalog CSV loading.
//!
//! Government registries publish the CUPS table as CSV with `Codigo` and
//! `Nombre` columns. Malformed rows (unparseable, or with an empty code
//! or name) are skipped and counted rather than failing the whole file;
//! import is re-runnable, so a corrected export can simply be imported
//! again.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

/// One usable catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Procedure code as printed in the catalog (any textual format).
    pub code: String,
    /// Procedure description.
    pub description: String,
}

/// A loaded catalog file.
#[derive(Debug)]
pub struct CupsCatalog {
    /// Source file name (for reporting).
    pub source: String,
    pub entries: Vec<CatalogEntry>,
    /// Rows dropped as malformed or incomplete.
    pub skipped: usize,
}

/// Row from CUPS catalog CSV files.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Codigo")]
    codigo: String,
    #[serde(rename = "Nombre")]
    nombre: String,
}

/// Load a CUPS catalog from a CSV file.
pub fn load_catalog(path: &Path) -> Result<CupsCatalog> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("open catalog {}", path.display()))?;

    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for result in reader.deserialize::<CatalogRow>() {
        let row = match result {
            Ok(row) => row,
            Err(error) => {
                warn!(%error, "skipping malformed catalog row");
                skipped += 1;
                continue;
            }
        };

        let code = row.codigo.trim();
        let description = row.nombre.trim();
        if code.is_empty() || description.is_empty() {
            warn!(code, "skipping catalog row with empty code or name");
            skipped += 1;
            continue;
        }

        entries.push(CatalogEntry {
            code: code.to_string(),
            description: description.to_string(),
        });
    }

    let source = path
        .file_name()
        .and_then(|v| v.to_str())
        .unwrap_or("catalog")
        .to_string();

    Ok(CupsCatalog {
        source,
        entries,
        skipped,
    })
}
