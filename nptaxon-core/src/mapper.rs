use crate::error::TaxonomyResult;
use crate::normalizer::{normalize, upper_view};
use crate::rules::engine::{compile, OrderedRules};
use crate::rules::specialty::specialty_rules;
use crate::types::CanonicalLabel;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Where a canonical label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "rule", rename_all = "snake_case")]
pub enum MappingSource {
    /// A named rule in the ordered table.
    Rule(&'static str),
    /// Generic clean-up: "Nurse Practitioner" → "NP", trailing "NP" ensured.
    Fallback,
    /// No NP indicator anywhere; text returned cleaned but without a suffix.
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    pub label: CanonicalLabel,
    pub source: MappingSource,
}

/// Maps free-text specialty strings onto the canonical label set.
///
/// Never fails on input. Unrecognized text that carries an NP indicator comes
/// back cleaned with an "NP" suffix rather than discarded, so the output
/// vocabulary is open-ended around a closed preferred subset.
#[derive(Debug, Clone)]
pub struct CanonicalMapper {
    rules: OrderedRules<&'static str>,
    nurse_practitioner: Regex,
    pediatric: Regex,
    ends_with_np: Regex,
    np_indicator: Regex,
}

impl CanonicalMapper {
    pub fn new() -> TaxonomyResult<Self> {
        Ok(Self {
            rules: specialty_rules()?,
            nurse_practitioner: compile(r"(?i)\bNurse\s+Practitioner\b")?,
            pediatric: compile(r"(?i)\bPediatric\b")?,
            ends_with_np: compile(r"(?i)\bNP$")?,
            np_indicator: compile(r"(?i)NP|Nurse\s+Practitioner")?,
        })
    }

    /// Canonicalize a specialty string. `None` only when the input is blank.
    pub fn canonicalize(&self, specialty: &str) -> Option<CanonicalLabel> {
        self.map_traced(specialty).map(|mapping| mapping.label)
    }

    pub fn map_traced(&self, specialty: &str) -> Option<Mapping> {
        let cleaned = normalize(Some(specialty));
        if cleaned.is_empty() {
            return None;
        }

        let upper = upper_view(&cleaned);
        if let Some(rule) = self.rules.first_match(&upper) {
            debug!(
                specialty = %cleaned,
                rule = rule.name,
                label = rule.outcome,
                "specialty rule matched"
            );
            return Some(Mapping {
                label: CanonicalLabel::new(rule.outcome),
                source: MappingSource::Rule(rule.name),
            });
        }

        Some(self.fallback(&cleaned))
    }

    fn fallback(&self, cleaned: &str) -> Mapping {
        let shortened = self.nurse_practitioner.replace_all(cleaned, "NP");
        let mut label = self.pediatric.replace_all(&shortened, "Pediatrics").into_owned();

        let has_indicator = self.np_indicator.is_match(cleaned);
        if has_indicator && !self.ends_with_np.is_match(&label) {
            label = format!("{} NP", label.trim_end());
        }
        let label = normalize(Some(&label));

        // cleanup can reduce e.g. "Other Nurse Practitioner" to a sentinel spelling
        let upper = upper_view(&label);
        if upper == "OTHER" || upper == "OTHER NP" {
            return Mapping {
                label: CanonicalLabel::other(),
                source: MappingSource::Rule("other"),
            };
        }

        let source = if has_indicator {
            MappingSource::Fallback
        } else {
            MappingSource::Passthrough
        };
        debug!(specialty = cleaned, label = %label, ?source, "specialty fallback");
        Mapping {
            label: CanonicalLabel::new(label),
            source,
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.names().collect()
    }
}
