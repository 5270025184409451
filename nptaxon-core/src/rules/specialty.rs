// Specialty text → canonical label rule table.
//
// Evaluated against the upper-cased normalized specialty. The "other" rule
// must stay first. Group rules (pediatrics, adult-gerontology) sit before the
// generic primary/acute rules so "Adult-Gerontology Acute Care NP" is not
// swallowed by "Acute Care NP".

use super::engine::{Matcher, OrderedRules};
use crate::error::TaxonomyResult;

/// Spellings that mark the adult-gerontology population.
const ADULT_GERO_MARKERS: &[&str] = &["ADULT-GERO", "ADULT/GERO", "ADULT GERO", "GERONTOLOG"];

fn np_indicator() -> Matcher {
    Matcher::contains_any(&["NP", "NURSE PRACTITIONER", "N P"])
}

pub fn specialty_rules() -> TaxonomyResult<OrderedRules<&'static str>> {
    let adult_gero = || Matcher::contains_any(ADULT_GERO_MARKERS);

    Ok(OrderedRules::new()
        .rule(
            "other",
            Matcher::equals_any(&["OTHER", "OTHER NP"]),
            "Other NP",
        )
        .rule(
            "psych",
            Matcher::contains_any(&[
                "PSYCHIATRIC-MENTAL HEALTH NURSE PRACTITIONER",
                "PSYCH",
                "MENTAL HEALTH",
                "PMHNP",
            ]),
            "Psych/Mental Health NP",
        )
        // Pediatrics
        .rule(
            "pediatrics_acute",
            Matcher::AllOf(vec![
                Matcher::Contains("PEDIATRIC"),
                Matcher::contains_any(&["ACUTE", "CRITICAL CARE"]),
            ]),
            "Pediatrics Acute Care NP",
        )
        .rule(
            "pediatrics_primary",
            Matcher::AllOf(vec![Matcher::Contains("PEDIATRIC"), Matcher::Contains("PRIMARY")]),
            "Pediatrics Primary Care NP",
        )
        .rule(
            "pediatrics",
            Matcher::contains_any(&[
                "PEDIATRICS NP",
                "PEDIATRIC NP",
                "PEDIATRIC NURSE PRACTITIONER",
            ]),
            "Pediatrics NP",
        )
        // Neonatal
        .rule(
            "neonatal",
            Matcher::AnyOf(vec![
                Matcher::Contains("NEONATAL NURSE PRACTITIONER"),
                Matcher::AllOf(vec![Matcher::Contains("NEONATAL"), Matcher::Contains("NP")]),
            ]),
            "Neonatal NP",
        )
        // Women's health, including OB/GYN spellings
        .rule(
            "womens_health",
            Matcher::contains_any(&[
                "OBGYN NP",
                "OB/GYN NP",
                "OB-GYN NP",
                "WOMEN'S HEALTH NURSE PRACTITIONER",
                "WOMENS HEALTH NURSE PRACTITIONER",
                "WOMEN'S HEALTH NP",
                "WOMENS HEALTH NP",
            ]),
            "Women's Health NP",
        )
        // Adult-gerontology
        .rule(
            "adult_gero_acute",
            Matcher::AllOf(vec![adult_gero(), Matcher::Contains("ACUTE")]),
            "Adult-Gerontology Acute Care NP",
        )
        .rule(
            "adult_gero_primary",
            Matcher::AllOf(vec![adult_gero(), Matcher::Contains("PRIMARY")]),
            "Adult-Gerontology Primary Care NP",
        )
        .rule(
            "adult_gero",
            Matcher::AllOf(vec![adult_gero(), np_indicator()]),
            "Adult-Gerontology NP",
        )
        // Generic adult / primary / acute
        .rule(
            "adult",
            Matcher::equals_any(&["ADULT NURSE PRACTITIONER", "ADULT NP"]),
            "Adult NP",
        )
        .rule(
            "primary_care",
            Matcher::AllOf(vec![Matcher::Contains("PRIMARY CARE"), Matcher::Contains("NP")]),
            "Primary Care NP",
        )
        .rule(
            "acute_care",
            Matcher::AnyOf(vec![
                Matcher::equals_any(&["ACUTE CARE NP", "ACUTE CARE NURSE PRACTITIONER"]),
                Matcher::AllOf(vec![Matcher::Contains("ACUTE CARE"), Matcher::Contains("NP")]),
            ]),
            "Acute Care NP",
        )
        .rule("family", Matcher::Contains("FAMILY"), "Family NP"))
}
