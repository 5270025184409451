use serde::{Deserialize, Serialize};
use std::fmt;

/// Label written when a blank row cannot be matched to an observed label.
pub const FILL_SENTINEL: &str = "Other";

/// Canonical form of every "Other" variant.
pub const CANONICAL_SENTINEL: &str = "Other NP";

// ===== BUCKETS =====
// Coarse credential buckets. Only used to narrow the observed label set;
// never written to output. The NONE bucket is `Option::<Bucket>::None`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bucket {
    Psych,
    AgAcute,
    AgPrimary,
    Family,
    Primary,
    Peds,
    Women,
    Neonatal,
    Emergency,
    Generic,
}

impl Bucket {
    /// All buckets in classification priority order.
    pub const ALL: [Bucket; 10] = [
        Bucket::Psych,
        Bucket::AgAcute,
        Bucket::AgPrimary,
        Bucket::Family,
        Bucket::Primary,
        Bucket::Peds,
        Bucket::Women,
        Bucket::Neonatal,
        Bucket::Emergency,
        Bucket::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Psych => "PSYCH",
            Bucket::AgAcute => "AG_ACUTE",
            Bucket::AgPrimary => "AG_PRIMARY",
            Bucket::Family => "FAMILY",
            Bucket::Primary => "PRIMARY",
            Bucket::Peds => "PEDS",
            Bucket::Women => "WOMEN",
            Bucket::Neonatal => "NEONATAL",
            Bucket::Emergency => "EMERGENCY",
            Bucket::Generic => "GENERIC",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== LABELS =====

/// A specialty label in (or shaped like) the taxonomy, e.g. "Family NP".
///
/// The taxonomy is open-ended: the mapper's generic fallback can produce
/// labels outside the preferred set, so this is a newtype over `String`
/// rather than an enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalLabel(String);

impl CanonicalLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn other() -> Self {
        Self(CANONICAL_SENTINEL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for CanonicalLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The preferred (closed) subset of the taxonomy. Every entry canonicalizes
/// to itself.
pub const PREFERRED_LABELS: [&str; 14] = [
    "Acute Care NP",
    "Adult NP",
    "Adult-Gerontology Acute Care NP",
    "Adult-Gerontology NP",
    "Adult-Gerontology Primary Care NP",
    "Family NP",
    "Neonatal NP",
    "Other NP",
    "Pediatrics Acute Care NP",
    "Pediatrics NP",
    "Pediatrics Primary Care NP",
    "Primary Care NP",
    "Psych/Mental Health NP",
    "Women's Health NP",
];

// ===== RECORDS =====

/// The two raw fields the engine reads from a roster row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub specialty: Option<String>,
    pub credentials: Option<String>,
}

impl RosterRecord {
    pub fn new(specialty: Option<&str>, credentials: Option<&str>) -> Self {
        Self {
            specialty: specialty.map(str::to_string),
            credentials: credentials.map(str::to_string),
        }
    }
}

/// Outcome of the fill policy for a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ClassificationResult {
    /// The row already had a specialty; it is returned verbatim.
    Kept(String),
    /// Blank specialty filled with the nearest observed label for the bucket.
    Inferred { bucket: Bucket, label: CanonicalLabel },
    /// Blank specialty with no bucket, or no qualifying observed label.
    Unmatched { bucket: Option<Bucket> },
}

impl ClassificationResult {
    /// The value written to the output column. Never blank.
    pub fn label(&self) -> &str {
        match self {
            ClassificationResult::Kept(value) => value,
            ClassificationResult::Inferred { label, .. } => label.as_str(),
            ClassificationResult::Unmatched { .. } => FILL_SENTINEL,
        }
    }

    pub fn was_filled(&self) -> bool {
        !matches!(self, ClassificationResult::Kept(_))
    }

    pub fn bucket(&self) -> Option<Bucket> {
        match self {
            ClassificationResult::Kept(_) => None,
            ClassificationResult::Inferred { bucket, .. } => Some(*bucket),
            ClassificationResult::Unmatched { bucket } => *bucket,
        }
    }
}
