use crate::error::TaxonomyResult;
use crate::normalizer::upper_view;
use crate::rules::credentials::credential_rules;
use crate::rules::engine::OrderedRules;
use crate::types::Bucket;
use tracing::debug;

/// Maps a normalized credential string to a coarse bucket.
///
/// Pure and total: empty or garbage input resolves to `None` (the NONE
/// bucket). Safe to share across threads.
#[derive(Debug, Clone)]
pub struct BucketClassifier {
    rules: OrderedRules<Bucket>,
}

impl BucketClassifier {
    pub fn new() -> TaxonomyResult<Self> {
        Ok(Self {
            rules: credential_rules()?,
        })
    }

    pub fn classify_bucket(&self, cred: &str) -> Option<Bucket> {
        self.classify_traced(cred).map(|(bucket, _)| bucket)
    }

    /// Like [`classify_bucket`](Self::classify_bucket), also naming the rule that fired.
    pub fn classify_traced(&self, cred: &str) -> Option<(Bucket, &'static str)> {
        if cred.is_empty() {
            return None;
        }

        let upper = upper_view(cred);
        let hit = self
            .rules
            .first_match(&upper)
            .map(|rule| (rule.outcome, rule.name));

        match hit {
            Some((bucket, rule)) => debug!(credentials = cred, %bucket, rule, "bucket matched"),
            None => debug!(credentials = cred, "no bucket"),
        }
        hit
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.names().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;

    fn bucket(raw: &str) -> Option<Bucket> {
        let classifier = BucketClassifier::new().unwrap();
        classifier.classify_bucket(&normalize(Some(raw)))
    }

    #[test]
    fn rule_order_is_fixed() {
        let classifier = BucketClassifier::new().unwrap();
        assert_eq!(
            classifier.rule_names(),
            vec![
                "psych",
                "adult_gero_acute",
                "adult_gero_primary",
                "family",
                "primary",
                "pediatrics",
                "womens_health",
                "neonatal",
                "emergency",
                "generic_np",
            ]
        );
    }

    #[test]
    fn psych_beats_generic() {
        assert_eq!(bucket("PMHNP, NP"), Some(Bucket::Psych));
        assert_eq!(bucket("pmhnp-bc"), Some(Bucket::Psych));
        assert_eq!(bucket("Psychiatric NP"), Some(Bucket::Psych));
        assert_eq!(bucket("Mental Health"), Some(Bucket::Psych));
    }

    #[test]
    fn adult_gero_acute_variants() {
        assert_eq!(bucket("AGACNP-BC"), Some(Bucket::AgAcute));
        assert_eq!(bucket("AG-ACNP"), Some(Bucket::AgAcute));
        assert_eq!(bucket("ACNP"), Some(Bucket::AgAcute));
        assert_eq!(bucket("ACNPC-AG"), Some(Bucket::AgAcute));
        assert_eq!(bucket("Acute Care NP"), Some(Bucket::AgAcute));
    }

    #[test]
    fn adult_gero_primary_variants() {
        assert_eq!(bucket("AGPCNP-BC"), Some(Bucket::AgPrimary));
        assert_eq!(bucket("Adult Primary Care"), Some(Bucket::AgPrimary));
        assert_eq!(bucket("AGNP-PC"), Some(Bucket::AgPrimary));
        assert_eq!(bucket("Gerontology PC"), Some(Bucket::AgPrimary));
    }

    #[test]
    fn family_before_generic_primary() {
        assert_eq!(bucket("FNP-BC"), Some(Bucket::Family));
        assert_eq!(bucket("F-NP"), Some(Bucket::Family));
        assert_eq!(bucket("Family Primary Care"), Some(Bucket::Family));
        assert_eq!(bucket("Primary Care"), Some(Bucket::Primary));
    }

    #[test]
    fn specialty_buckets() {
        assert_eq!(bucket("CPNP-PC"), Some(Bucket::Peds));
        assert_eq!(bucket("CNP"), Some(Bucket::Peds));
        assert_eq!(bucket("Pediatrics"), Some(Bucket::Peds));
        assert_eq!(bucket("WHNP-BC"), Some(Bucket::Women));
        assert_eq!(bucket("Women's Health"), Some(Bucket::Women));
        assert_eq!(bucket("NNP-BC"), Some(Bucket::Neonatal));
        assert_eq!(bucket("Neonatology"), Some(Bucket::Neonatal));
        assert_eq!(bucket("ENP-C"), Some(Bucket::Emergency));
        assert_eq!(bucket("Emergency"), Some(Bucket::Emergency));
    }

    #[test]
    fn generic_and_none() {
        assert_eq!(bucket("APRN, NP"), Some(Bucket::Generic));
        assert_eq!(bucket("np"), Some(Bucket::Generic));
        assert_eq!(bucket("RN"), None);
        assert_eq!(bucket("MSN, RN"), None);
        assert_eq!(bucket(""), None);
        assert_eq!(bucket("   "), None);
        assert_eq!(bucket("@@##"), None);
    }

    #[test]
    fn traced_reports_rule_name() {
        let classifier = BucketClassifier::new().unwrap();
        assert_eq!(
            classifier.classify_traced("FNP"),
            Some((Bucket::Family, "family"))
        );
    }
}
