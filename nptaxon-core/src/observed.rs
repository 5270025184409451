use crate::normalizer::is_blank;
use serde::Serialize;
use std::collections::HashSet;

/// Distinct specialty labels already present in a dataset before any fill.
///
/// Built once (pass 1) and read-only afterwards; pass 2 only ever borrows it,
/// so a label produced for one row can never become a candidate for another.
/// Labels are kept verbatim (trimmed) in case-insensitive ascending order,
/// which is also the selector's tie-break order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ObservedLabelSet {
    labels: Vec<String>,
}

impl ObservedLabelSet {
    /// Collect from the raw specialty column. Blank cells are skipped.
    pub fn collect<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut seen = HashSet::new();
        let mut labels = Vec::new();
        for value in values {
            let Some(value) = value else { continue };
            if is_blank(Some(value)) {
                continue;
            }
            let label = value.trim();
            if seen.insert(label.to_string()) {
                labels.push(label.to_string());
            }
        }

        // stable: labels equal up to case keep first-seen order
        labels.sort_by_cached_key(|label| label.to_uppercase());
        Self { labels }
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let owned: Vec<S> = labels.into_iter().collect();
        Self::collect(owned.iter().map(|label| Some(label.as_ref())))
    }

    /// Labels in case-insensitive ascending order.
    pub fn sorted(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
