use crate::error::TaxonomyResult;
use crate::observed::ObservedLabelSet;
use crate::rules::engine::compile;
use crate::types::{Bucket, CanonicalLabel};
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// Required sub-patterns per bucket, matched against the upper-cased label.
/// A label must satisfy every entry to qualify.
fn required_patterns(bucket: Bucket) -> &'static [&'static str] {
    match bucket {
        Bucket::Psych => &["PSYCH|PMH"],
        Bucket::AgAcute => &["ACUTE", "AG|ADULT|GERO"],
        Bucket::AgPrimary => &["PRIMARY|PC", "AG|ADULT|GERO"],
        Bucket::Family => &["FAMILY|F-?NP"],
        Bucket::Primary => &["PRIMARY"],
        Bucket::Peds => &["PEDIATR|PNP"],
        Bucket::Women => &["WOMEN|WHNP"],
        Bucket::Neonatal => &["NEONAT|NNP"],
        Bucket::Emergency => &["EMERGEN|ENP"],
        Bucket::Generic => &[r"\bNP\b|NURSE PRACTITIONER"],
    }
}

/// Picks the closest already-observed label for a credential bucket.
///
/// Scoring: a label failing any required pattern is disqualified. Qualifiers
/// score `patterns * 10 - label length`; highest wins, ties go to the first
/// label in case-insensitive order. The heuristic is kept exactly as is
/// because downstream label distributions depend on it.
#[derive(Debug, Clone)]
pub struct NearestLabelSelector {
    patterns: HashMap<Bucket, Vec<Regex>>,
}

impl NearestLabelSelector {
    pub fn new() -> TaxonomyResult<Self> {
        let mut patterns = HashMap::new();
        for bucket in Bucket::ALL {
            let compiled = required_patterns(bucket)
                .iter()
                .map(|p| compile(p))
                .collect::<TaxonomyResult<Vec<_>>>()?;
            patterns.insert(bucket, compiled);
        }
        Ok(Self { patterns })
    }

    /// Score a single label, `None` when it is disqualified.
    pub fn score(&self, bucket: Bucket, label: &str) -> Option<i64> {
        let patterns = self.patterns.get(&bucket)?;
        let upper = label.to_uppercase();
        if !patterns.iter().all(|p| p.is_match(&upper)) {
            return None;
        }
        Some(patterns.len() as i64 * 10 - upper.chars().count() as i64)
    }

    /// Never returns a label outside `candidates`.
    pub fn select_nearest(
        &self,
        bucket: Option<Bucket>,
        candidates: &ObservedLabelSet,
    ) -> Option<CanonicalLabel> {
        let bucket = bucket?;

        let mut best: Option<(&str, i64)> = None;
        for label in candidates.sorted() {
            let Some(score) = self.score(bucket, label) else {
                continue;
            };
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((label.as_str(), score));
            }
        }

        match best {
            Some((label, score)) => {
                debug!(%bucket, label, score, "nearest observed label");
                Some(CanonicalLabel::new(label))
            }
            None => {
                debug!(%bucket, candidates = candidates.len(), "no observed label qualifies");
                None
            }
        }
    }
}
