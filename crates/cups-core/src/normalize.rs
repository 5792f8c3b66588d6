//! Canonicalization of raw CUPS code strings.
//!
//! Upstream systems deliver the same procedure code as `"890201"`,
//! `"0000890201"`, `"89.02.01"`, or `"89-02-01"`. [`normalize`] collapses
//! all of them to a single canonical form so the rest of the registry can
//! key on one string.

/// Characters treated as group separators and removed everywhere, not
/// just at the edges.
const SEPARATORS: [char; 3] = [' ', '.', '-'];

/// Normalize a raw code string to its canonical form.
///
/// Uppercases, trims, removes every space/dot/dash occurrence, then
/// strips leading zeros — unless that would leave an empty string, so
/// `"0"` stays `"0"` while `"0000890201"` becomes `"890201"`.
///
/// Total over all inputs: the empty string normalizes to itself and no
/// input is an error. Idempotent: `normalize(normalize(s)) == normalize(s)`.
///
/// # Example
/// ```
/// use cups_core::normalize;
///
/// assert_eq!(normalize("  89.02.01 "), "890201");
/// assert_eq!(normalize("0000890201"), "890201");
/// assert_eq!(normalize("0"), "0");
/// ```
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !SEPARATORS.contains(c))
        .collect();

    let unpadded = stripped.trim_start_matches('0');
    if unpadded.is_empty() && !stripped.is_empty() {
        // All zeros: keep a single one rather than emptying the code
        "0".to_string()
    } else {
        unpadded.to_string()
    }
}
