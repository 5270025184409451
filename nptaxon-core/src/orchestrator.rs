use crate::classifier::BucketClassifier;
use crate::error::TaxonomyResult;
use crate::normalizer::{is_blank, normalize};
use crate::observed::ObservedLabelSet;
use crate::selector::NearestLabelSelector;
use crate::types::{ClassificationResult, RosterRecord};

/// Per-row fill policy.
///
/// Holds the frozen observed label set by reference, so it can only be built
/// after pass 1 has finished and can be shared across pass-2 workers.
pub struct FillOrchestrator<'a> {
    classifier: &'a BucketClassifier,
    selector: &'a NearestLabelSelector,
    observed: &'a ObservedLabelSet,
}

impl<'a> FillOrchestrator<'a> {
    pub fn new(
        classifier: &'a BucketClassifier,
        selector: &'a NearestLabelSelector,
        observed: &'a ObservedLabelSet,
    ) -> Self {
        Self {
            classifier,
            selector,
            observed,
        }
    }

    /// Decide the output value for one row:
    ///
    /// 1. non-blank specialty → kept verbatim, nothing else runs
    /// 2. otherwise bucket the credentials
    /// 3. no bucket → sentinel
    /// 4. nearest observed label for the bucket, or sentinel
    pub fn fill(&self, record: &RosterRecord) -> ClassificationResult {
        if let Some(existing) = record.specialty.as_deref() {
            if !is_blank(Some(existing)) {
                return ClassificationResult::Kept(existing.to_string());
            }
        }

        let credentials = normalize(record.credentials.as_deref());
        let Some(bucket) = self.classifier.classify_bucket(&credentials) else {
            return ClassificationResult::Unmatched { bucket: None };
        };

        match self.selector.select_nearest(Some(bucket), self.observed) {
            Some(label) => ClassificationResult::Inferred { bucket, label },
            None => ClassificationResult::Unmatched {
                bucket: Some(bucket),
            },
        }
    }
}

/// Owns the stateless engine parts so callers only supply the observed set.
#[derive(Debug, Clone)]
pub struct FillEngine {
    pub classifier: BucketClassifier,
    pub selector: NearestLabelSelector,
}

impl FillEngine {
    pub fn new() -> TaxonomyResult<Self> {
        Ok(Self {
            classifier: BucketClassifier::new()?,
            selector: NearestLabelSelector::new()?,
        })
    }

    pub fn orchestrator<'a>(&'a self, observed: &'a ObservedLabelSet) -> FillOrchestrator<'a> {
        FillOrchestrator::new(&self.classifier, &self.selector, observed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bucket, FILL_SENTINEL};

    fn fill_one(
        specialty: Option<&str>,
        credentials: Option<&str>,
        observed: &[&str],
    ) -> ClassificationResult {
        let engine = FillEngine::new().unwrap();
        let observed = ObservedLabelSet::from_labels(observed);
        engine
            .orchestrator(&observed)
            .fill(&RosterRecord::new(specialty, credentials))
    }

    #[test]
    fn non_blank_specialty_is_kept_verbatim() {
        for creds in [Some("PMHNP"), Some("RN"), None, Some("")] {
            let result = fill_one(Some("  some Custom label "), creds, &["Family NP"]);
            assert_eq!(result, ClassificationResult::Kept("  some Custom label ".to_string()));
            assert!(!result.was_filled());
        }
    }

    #[test]
    fn family_credentials_fill_family_label() {
        let result = fill_one(None, Some("FNP-BC"), &["Family NP"]);
        assert_eq!(result.label(), "Family NP");
        assert_eq!(result.bucket(), Some(Bucket::Family));
    }

    #[test]
    fn unbucketed_credentials_fall_back_to_sentinel() {
        let result = fill_one(Some(""), Some("RN"), &["Family NP"]);
        assert_eq!(result, ClassificationResult::Unmatched { bucket: None });
        assert_eq!(result.label(), FILL_SENTINEL);
    }

    #[test]
    fn bucket_without_observed_label_falls_back_to_sentinel() {
        let result = fill_one(None, Some("NNP-BC"), &["Family NP"]);
        assert_eq!(
            result,
            ClassificationResult::Unmatched {
                bucket: Some(Bucket::Neonatal)
            }
        );
        assert_eq!(result.label(), "Other");
    }

    #[test]
    fn empty_observed_set_degrades_to_sentinel() {
        let result = fill_one(None, Some("FNP"), &[]);
        assert_eq!(result.label(), "Other");
    }

    #[test]
    fn whitespace_only_specialty_counts_as_blank() {
        let result = fill_one(Some(" \u{00A0} "), Some("PMHNP"), &["Psych/Mental Health NP"]);
        assert_eq!(result.label(), "Psych/Mental Health NP");
        assert!(result.was_filled());
    }
}
