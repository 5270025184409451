// Credential → bucket rule table.
//
// Evaluated against the upper-cased credential string. The generic bare-NP
// test must stay last; PRIMARY must stay after FAMILY and AG_PRIMARY.

use super::engine::{Matcher, OrderedRules};
use crate::error::TaxonomyResult;
use crate::types::Bucket;

pub fn credential_rules() -> TaxonomyResult<OrderedRules<Bucket>> {
    let adult_gero = Matcher::contains_any(&["AGNP", "ADULT", "GERO"]);

    Ok(OrderedRules::new()
        .rule(
            "psych",
            Matcher::AnyOf(vec![
                Matcher::word("PMHNP")?,
                Matcher::contains_any(&["PSYCH", "MENTAL"]),
            ]),
            Bucket::Psych,
        )
        .rule(
            "adult_gero_acute",
            Matcher::AnyOf(vec![
                Matcher::word("AGACNP")?,
                Matcher::word("AG-?ACNP")?,
                Matcher::word("ACNP")?,
                Matcher::Contains("ACUTE"),
                Matcher::word("ACNPC-?AG")?,
            ]),
            Bucket::AgAcute,
        )
        .rule(
            "adult_gero_primary",
            Matcher::AnyOf(vec![
                Matcher::word("AGPCNP")?,
                // bare "PC" also fires inside longer tokens
                Matcher::AllOf(vec![Matcher::contains_any(&["PRIMARY", "PC"]), adult_gero]),
            ]),
            Bucket::AgPrimary,
        )
        .rule(
            "family",
            Matcher::AnyOf(vec![Matcher::word("F-?NP")?, Matcher::Contains("FAMILY")]),
            Bucket::Family,
        )
        .rule("primary", Matcher::Contains("PRIMARY"), Bucket::Primary)
        .rule(
            "pediatrics",
            Matcher::AnyOf(vec![Matcher::word("CP?NP")?, Matcher::Contains("PEDIATR")]),
            Bucket::Peds,
        )
        .rule(
            "womens_health",
            Matcher::AnyOf(vec![Matcher::word("WHNP")?, Matcher::Contains("WOMEN")]),
            Bucket::Women,
        )
        .rule(
            "neonatal",
            Matcher::AnyOf(vec![Matcher::word("NNP")?, Matcher::Contains("NEONAT")]),
            Bucket::Neonatal,
        )
        .rule(
            "emergency",
            Matcher::AnyOf(vec![Matcher::word("ENP")?, Matcher::Contains("EMERGENCY")]),
            Bucket::Emergency,
        )
        .rule("generic_np", Matcher::word("NP")?, Bucket::Generic))
}
