// Address field clean-up used by the standardize pass.

use crate::config::TaxonomyConfig;

/// Trim a ZIP or ZIP+4 value to its first five digits; blank when none found.
pub fn zip5(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let compact: String = raw.trim().chars().filter(|c| *c != ' ').collect();
    let head = compact.split('-').next().unwrap_or_default();

    let chars: Vec<char> = head.chars().collect();
    chars
        .windows(5)
        .find(|window| window.iter().all(|c| c.is_ascii_digit()))
        .map(|window| window.iter().collect())
        .unwrap_or_default()
}

/// Merge a second street line into the first.
///
/// Blank markers on either side count as empty. When both lines are present
/// they are joined with a single space and inner whitespace runs collapse.
pub fn merge_street(first: Option<&str>, second: Option<&str>, config: &TaxonomyConfig) -> String {
    let clean = |value: Option<&str>| -> String {
        match value {
            Some(v) if !config.is_blank_marker(v) => v.trim().to_string(),
            _ => String::new(),
        }
    };
    let a = clean(first);
    let b = clean(second);

    match (a.is_empty(), b.is_empty()) {
        (true, true) => String::new(),
        (false, false) => format!("{a} {b}")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
        (false, true) => a,
        (true, false) => b,
    }
}
