//! Equivalence-set generation.
//!
//! Given a principal code, [`generate_variants`] produces every textual
//! format the platform knows upstream systems to use for it: the
//! canonical form, the zero-padded 10-digit form, pair-grouped 6-digit
//! forms with dot/dash/space separators, and the dot-grouped 4-2-2-2
//! rendering of the padded form.

use std::collections::BTreeSet;

use crate::normalize::normalize;

/// Length of the zero-padded long form used by government registries.
const PADDED_LEN: usize = 10;

/// Length of the short form used on most claim documents.
const SHORT_LEN: usize = 6;

/// Generate the complete set of known textual variants for a code.
///
/// The input need not be canonical; the canonical form is re-derived
/// internally and the literal input is preserved in the result, so a
/// caller that passes an already-formatted code does not lose that exact
/// string. Codes whose length fits neither the 6-digit nor the 10-digit
/// grouping rules simply skip those branches.
///
/// # Example
/// ```
/// use cups_core::generate_variants;
///
/// let variants = generate_variants("890201");
/// assert!(variants.contains("0000890201"));
/// assert!(variants.contains("89.02.01"));
/// assert!(variants.contains("0000.89.02.01"));
/// ```
pub fn generate_variants(principal_code: &str) -> BTreeSet<String> {
    let canon = normalize(principal_code);

    let mut variants = BTreeSet::new();
    variants.insert(canon.clone());
    variants.insert(principal_code.to_string());

    // Left-pad with zeros to the registry long form; codes already at or
    // past PADDED_LEN come through unchanged.
    let padded = format!("{canon:0>width$}", width = PADDED_LEN);
    variants.insert(padded.clone());

    if char_count(&canon) == SHORT_LEN {
        for separator in [".", "-", " "] {
            variants.insert(grouped(&canon, &[2, 2, 2], separator));
        }
    }

    if char_count(&padded) == PADDED_LEN {
        variants.insert(grouped(&padded, &[4, 2, 2, 2], "."));
        // The short form embedded in the padded representation
        variants.insert(suffix(&padded, SHORT_LEN));
    }

    variants
}

fn char_count(code: &str) -> usize {
    code.chars().count()
}

/// Split `code` into consecutive groups of the given sizes and join them
/// with `separator`. Callers guarantee the sizes sum to the code length.
fn grouped(code: &str, sizes: &[usize], separator: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut parts = Vec::with_capacity(sizes.len());
    let mut start = 0;
    for &size in sizes {
        parts.push(chars[start..start + size].iter().collect::<String>());
        start += size;
    }
    parts.join(separator)
}

/// The final `len` characters of `code`, unseparated.
fn suffix(code: &str, len: usize) -> String {
    let chars: Vec<char> = code.chars().collect();
    chars[chars.len() - len..].iter().collect()
}
