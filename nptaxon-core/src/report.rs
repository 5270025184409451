use crate::observed::ObservedLabelSet;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

const BLANK_DISPLAY: &str = "(blank)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeCount {
    pub original: String,
    pub canonical: String,
    pub count: usize,
}

/// Value counts, descending by count then ascending by label. Blank values
/// count under the empty string.
pub fn count_values<'a, I>(values: I) -> Vec<LabelCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut counts: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    counts
}

/// Distinct non-blank values in ascending order.
pub fn distinct_sorted<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut distinct: Vec<String> = values
        .into_iter()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    distinct.sort();
    distinct.dedup();
    distinct
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &[LabelCount]) -> fmt::Result {
    let width = counts
        .iter()
        .map(|c| c.label.chars().count().max(BLANK_DISPLAY.len()))
        .max()
        .unwrap_or(0);
    for c in counts {
        let label = if c.label.is_empty() {
            BLANK_DISPLAY
        } else {
            c.label.as_str()
        };
        writeln!(f, "   {label:<width$}  {}", c.count)?;
    }
    Ok(())
}

/// Distinct vocabulary and counts of one column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnReport {
    pub column: String,
    pub total_rows: usize,
    pub vocabulary: Vec<String>,
    pub counts: Vec<LabelCount>,
}

impl ColumnReport {
    /// Build from raw cells; values are trimmed and blanks counted as empty.
    pub fn from_values<'a, I>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let values: Vec<&str> = values
            .into_iter()
            .map(|v| v.map(str::trim).unwrap_or(""))
            .collect();
        Self {
            column: column.to_string(),
            total_rows: values.len(),
            vocabulary: distinct_sorted(values.iter().copied()),
            counts: count_values(values.iter().copied()),
        }
    }

    pub fn count_of(&self, label: &str) -> usize {
        self.counts
            .iter()
            .find(|c| c.label == label)
            .map_or(0, |c| c.count)
    }
}

impl fmt::Display for ColumnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "\nDistinct categories in '{}' ({}):",
            self.column,
            self.vocabulary.len()
        )?;
        for label in &self.vocabulary {
            writeln!(f, " - {label}")?;
        }
        writeln!(f, "\nCounts for '{}':", self.column)?;
        write_counts(f, &self.counts)
    }
}

/// Outcome of a two-pass fill over a dataset.
#[derive(Debug, Clone, Serialize)]
pub struct FillReport {
    pub generated_at: DateTime<Utc>,
    pub specialty_column: String,
    pub credentials_column: String,
    pub output_column: String,
    pub total_rows: usize,
    /// Rows whose specialty was blank and went through inference
    pub blank_specialty_rows: usize,
    /// Blank rows that received an observed label
    pub inferred_rows: usize,
    /// Blank rows that fell back to the sentinel
    pub unmatched_rows: usize,
    pub canonicalized: bool,
    pub observed_labels: ObservedLabelSet,
    pub vocabulary: Vec<String>,
    /// Resulting category of the blank-specialty rows only
    pub blank_counts: Vec<LabelCount>,
    /// Output column distribution over every row, kept rows included
    pub counts: Vec<LabelCount>,
}

impl FillReport {
    /// Save the report as pretty-printed JSON, creating the parent directory.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed writing report {}", path.display()))?;
        Ok(())
    }
}

impl fmt::Display for FillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "\nFilled '{}' from '{}' into '{}'",
            self.specialty_column, self.credentials_column, self.output_column
        )?;
        writeln!(
            f,
            "Rows: {} total, {} blank specialty ({} inferred, {} unmatched)",
            self.total_rows, self.blank_specialty_rows, self.inferred_rows, self.unmatched_rows
        )?;

        writeln!(f, "\nObserved labels ({}):", self.observed_labels.len())?;
        for label in self.observed_labels.sorted() {
            writeln!(f, " - {label}")?;
        }

        writeln!(
            f,
            "\nDistinct categories in '{}' ({}):",
            self.output_column,
            self.vocabulary.len()
        )?;
        for label in &self.vocabulary {
            writeln!(f, " - {label}")?;
        }

        writeln!(f, "\nBlank specialty rows by category:")?;
        write_counts(f, &self.blank_counts)?;

        writeln!(f, "\nCounts for '{}':", self.output_column)?;
        write_counts(f, &self.counts)
    }
}

/// Outcome of the field standardization pass.
#[derive(Debug, Clone, Serialize)]
pub struct StandardizeReport {
    pub filled: ColumnReport,
    /// Present when the specialty column existed
    pub original_counts: Option<Vec<LabelCount>>,
    pub changes: Vec<ChangeCount>,
    pub zip_standardized: bool,
    pub streets_merged: bool,
}

impl StandardizeReport {
    /// Top `limit` (original → canonical) pairs that differ, most frequent first.
    pub fn top_changes<'a, I>(pairs: I, limit: usize) -> Vec<ChangeCount>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
        for (original, canonical) in pairs {
            if original != canonical {
                *counts.entry((original, canonical)).or_default() += 1;
            }
        }
        let mut changes: Vec<ChangeCount> = counts
            .into_iter()
            .map(|((original, canonical), count)| ChangeCount {
                original: original.to_string(),
                canonical: canonical.to_string(),
                count,
            })
            .collect();
        changes.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.original.cmp(&b.original))
                .then_with(|| a.canonical.cmp(&b.canonical))
        });
        changes.truncate(limit);
        changes
    }
}

impl fmt::Display for StandardizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filled)?;

        let Some(original_counts) = &self.original_counts else {
            return Ok(());
        };
        writeln!(f, "\nOriginal values:")?;
        write_counts(f, original_counts)?;

        writeln!(f, "\nChanges (original -> canonical): top {}", self.changes.len())?;
        if self.changes.is_empty() {
            writeln!(f, "   No changes.")?;
        }
        for change in &self.changes {
            let original = if change.original.is_empty() {
                BLANK_DISPLAY
            } else {
                change.original.as_str()
            };
            writeln!(f, "   {original} -> {}  {}", change.canonical, change.count)?;
        }
        Ok(())
    }
}
