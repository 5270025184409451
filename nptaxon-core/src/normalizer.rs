//! Text normalizer for raw roster fields.
//!
//! Every string that reaches a rule is first passed through [`normalize`]:
//!
//! ```text
//! raw field
//!     ↓  NFKC compatibility normalization
//!     ↓  smart punctuation → ASCII (dashes, curly quotes)
//!     ↓  runs of U+FFFD → a single apostrophe
//!     ↓  whitespace runs → one space, trimmed
//! normalized text (case preserved)
//! ```
//!
//! Case is kept so labels can be returned as written. Rules compare against
//! [`upper_view`].

use unicode_normalization::UnicodeNormalization;

/// Left behind by an earlier decode with the wrong encoding, usually where an
/// apostrophe used to be ("Women\u{FFFD}s Health").
const REPLACEMENT_CHAR: char = '\u{FFFD}';

#[inline]
fn fold_punctuation(c: char) -> char {
    match c {
        '\u{2013}' | '\u{2014}' => '-',
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        other => other,
    }
}

/// Canonicalize a raw field. Absent input yields an empty string.
///
/// Total and deterministic; characters without a folding rule pass through
/// unchanged.
///
/// ```
/// use nptaxon_core::normalizer::normalize;
///
/// assert_eq!(normalize(Some("  Pediatric Nurse Practitioner \u{2013} Acute Care ")),
///            "Pediatric Nurse Practitioner - Acute Care");
/// assert_eq!(normalize(None), "");
/// ```
pub fn normalize(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let mut folded = String::with_capacity(raw.len());
    let mut in_replacement_run = false;
    for c in raw.nfkc() {
        if c == REPLACEMENT_CHAR {
            if !in_replacement_run {
                folded.push('\'');
            }
            in_replacement_run = true;
            continue;
        }
        in_replacement_run = false;
        folded.push(fold_punctuation(c));
    }

    // split_whitespace covers the non-breaking variants NFKC leaves alone
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-cased comparison view of already normalized text.
pub fn upper_view(normalized: &str) -> String {
    normalized.to_uppercase()
}

/// True when the field is absent or normalizes to nothing.
pub fn is_blank(raw: Option<&str>) -> bool {
    normalize(raw).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_are_blank() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(Some("")), "");
        assert_eq!(normalize(Some(" \t\n ")), "");
        assert!(is_blank(None));
        assert!(is_blank(Some("\u{00A0}\u{2003}")));
        assert!(!is_blank(Some("FNP")));
    }

    #[test]
    fn folds_dashes_and_quotes() {
        assert_eq!(normalize(Some("Adult\u{2014}Gerontology")), "Adult-Gerontology");
        assert_eq!(normalize(Some("Women\u{2019}s Health")), "Women's Health");
        assert_eq!(normalize(Some("\u{201C}NP\u{201D}")), "\"NP\"");
        assert_eq!(normalize(Some("\u{2018}x\u{2019}")), "'x'");
    }

    #[test]
    fn collapses_replacement_runs_to_one_apostrophe() {
        assert_eq!(
            normalize(Some("Women\u{FFFD}\u{FFFD}\u{FFFD}s Health NP")),
            "Women's Health NP"
        );
        assert_eq!(normalize(Some("a\u{FFFD}b\u{FFFD}c")), "a'b'c");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize(Some("  Family \u{00A0}\u{00A0} NP\t")), "Family NP");
        assert_eq!(normalize(Some("Family\r\nNurse   Practitioner")), "Family Nurse Practitioner");
    }

    #[test]
    fn applies_compatibility_normalization() {
        // fullwidth letters and the ﬁ ligature fold to ASCII under NFKC
        assert_eq!(normalize(Some("\u{FF26}\u{FF2E}\u{FF30}")), "FNP");
        assert_eq!(normalize(Some("\u{FB01}ne")), "fine");
    }

    #[test]
    fn preserves_case_but_upper_view_does_not() {
        let n = normalize(Some("Psych/Mental Health np"));
        assert_eq!(n, "Psych/Mental Health np");
        assert_eq!(upper_view(&n), "PSYCH/MENTAL HEALTH NP");
    }

    #[test]
    fn idempotent() {
        let once = normalize(Some("  Women\u{FFFD}s  Health \u{2013} NP "));
        assert_eq!(normalize(Some(&once)), once);
    }
}
