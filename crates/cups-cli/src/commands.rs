use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cups_cli::catalog::load_catalog;
use cups_core::{EquivalenceRegistry, normalize};
use cups_persistence::JsonStore;

use crate::cli::{ImportArgs, ListArgs, RegisterArgs, ResolveArgs};
use crate::summary::{print_record, print_record_list};

/// Counts from one catalog import.
pub struct ImportOutcome {
    pub source: String,
    pub created: usize,
    pub merged: usize,
    pub skipped: usize,
}

fn open_registry(store_path: &Path) -> Result<EquivalenceRegistry<JsonStore>> {
    let store = JsonStore::open(store_path)
        .with_context(|| format!("open registry store {}", store_path.display()))?;
    Ok(EquivalenceRegistry::new(store))
}

/// Resolve one code. Returns whether a record matched; a miss is a
/// normal outcome, reported on stdout rather than as an error.
pub fn run_resolve(store_path: &Path, args: &ResolveArgs) -> Result<bool> {
    let registry = open_registry(store_path)?;
    match registry.resolve(&args.code)? {
        Some(record) => {
            print_record(&record);
            Ok(true)
        }
        None => {
            println!("no active record matches '{}'", args.code);
            Ok(false)
        }
    }
}

pub fn run_register(store_path: &Path, args: &RegisterArgs) -> Result<()> {
    let mut registry = open_registry(store_path)?;

    // Operators paste codes in whatever format the claim document used;
    // the registry keys records by the canonical form.
    let principal = normalize(&args.code);
    let record = registry
        .register_or_merge(&principal, &args.description)
        .with_context(|| format!("register code '{}'", args.code))?;
    print_record(&record);
    Ok(())
}

pub fn run_import(store_path: &Path, args: &ImportArgs) -> Result<ImportOutcome> {
    let span = info_span!("import", catalog = %args.catalog.display());
    let _guard = span.enter();

    let catalog = load_catalog(&args.catalog)?;
    let mut registry = open_registry(store_path)?;

    let mut created = 0usize;
    let mut merged = 0usize;
    for entry in &catalog.entries {
        let principal = normalize(&entry.code);
        let before = registry.store().len();
        registry
            .register_or_merge(&principal, &entry.description)
            .with_context(|| format!("register catalog code '{}'", entry.code))?;
        if registry.store().len() > before {
            created += 1;
        } else {
            merged += 1;
        }
    }

    info!(
        source = %catalog.source,
        created,
        merged,
        skipped = catalog.skipped,
        "catalog import finished"
    );
    Ok(ImportOutcome {
        source: catalog.source,
        created,
        merged,
        skipped: catalog.skipped,
    })
}

pub fn run_list(store_path: &Path, args: &ListArgs) -> Result<()> {
    let registry = open_registry(store_path)?;
    let records: Vec<_> = registry
        .store()
        .records()
        .filter(|record| args.all || record.active)
        .collect();
    print_record_list(&records);
    Ok(())
}
