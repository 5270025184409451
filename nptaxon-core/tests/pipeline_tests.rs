//! Pipeline tests: roster CSV in, filled / canonicalized CSV out.
//!
//! Driven by `test_fixtures/roster_sample.csv`, a small roster export with
//! blank specialties, blank markers, mixed credential spellings, and
//! address fields for the standardize pass.
//!
//! - Engine properties (idempotence, sentinel, priority, disqualification)
//! - Two-pass fill over the fixture, sequential and parallel
//! - Column canonicalization, standardization, summaries
//! - Dataset round trips through the filesystem

use nptaxon_core::{
    Bucket, BucketClassifier, CanonicalMapper, ClassificationResult, Dataset, FillEngine,
    ObservedLabelSet, RosterRecord, StandardizeColumns, TaxonomyConfig, TaxonomyError,
    TaxonomyProcessor, PREFERRED_LABELS, STANDARDIZED_COLUMN,
};
use std::path::PathBuf;

// ============================================================================
// Fixture helpers
// ============================================================================

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures/roster_sample.csv")
}

fn load_roster() -> Dataset {
    Dataset::from_path(fixture_path(), &TaxonomyConfig::default())
        .unwrap_or_else(|e| panic!("Missing fixture {}: {e}", fixture_path().display()))
}

fn column_values(dataset: &Dataset, column: &str) -> Vec<Option<String>> {
    let index = dataset
        .column_index(column)
        .unwrap_or_else(|| panic!("column {column} missing"));
    dataset.column(index).map(|v| v.map(str::to_string)).collect()
}

fn value_for(dataset: &Dataset, name: &str, column: &str) -> Option<String> {
    let names = column_values(dataset, "Name");
    let row = names
        .iter()
        .position(|n| n.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("row {name} missing"));
    column_values(dataset, column)[row].clone()
}

fn filled_roster(config: &TaxonomyConfig) -> (Dataset, nptaxon_core::FillReport) {
    let mut dataset = load_roster();
    let report = TaxonomyProcessor::new()
        .unwrap()
        .fill_dataset(&mut dataset, config)
        .unwrap();
    (dataset, report)
}

// ============================================================================
// Engine properties
// ============================================================================

mod engine_properties {
    use super::*;

    #[test]
    fn preferred_labels_are_idempotent() {
        let mapper = CanonicalMapper::new().unwrap();
        for label in PREFERRED_LABELS {
            let once = mapper.canonicalize(label).unwrap();
            assert_eq!(once.as_str(), label, "{label} did not map to itself");
            let twice = mapper.canonicalize(once.as_str()).unwrap();
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn other_variants_map_to_other_np() {
        let mapper = CanonicalMapper::new().unwrap();
        let variants = [
            "OTHER",
            "  Other  ",
            "other",
            "OTHER NP",
            "Other  np",
            "Other Nurse Practitioner",
        ];
        for variant in variants {
            assert_eq!(
                mapper.canonicalize(variant).unwrap().as_str(),
                "Other NP",
                "variant {variant:?}"
            );
        }
    }

    #[test]
    fn non_blank_specialty_is_never_replaced() {
        let engine = FillEngine::new().unwrap();
        let observed = ObservedLabelSet::from_labels(["Family NP", "Psych/Mental Health NP"]);
        let orchestrator = engine.orchestrator(&observed);
        for creds in [None, Some("PMHNP"), Some("FNP-BC"), Some("RN"), Some("garbage")] {
            for specialty in ["Family NP", "something unusual", "OTHER"] {
                let result = orchestrator.fill(&RosterRecord::new(Some(specialty), creds));
                assert_eq!(result, ClassificationResult::Kept(specialty.to_string()));
            }
        }
    }

    #[test]
    fn psych_marker_beats_generic_np() {
        let classifier = BucketClassifier::new().unwrap();
        for creds in ["PMHNP NP", "NP, PMHNP-BC", "PMHNP"] {
            assert_eq!(classifier.classify_bucket(creds), Some(Bucket::Psych), "{creds}");
        }
    }

    #[test]
    fn ag_primary_selects_only_fully_qualified_label() {
        let engine = FillEngine::new().unwrap();
        let observed = ObservedLabelSet::from_labels([
            "Family NP",
            "Adult-Gerontology Primary Care NP",
            "Primary Care NP",
        ]);
        let label = engine
            .selector
            .select_nearest(Some(Bucket::AgPrimary), &observed)
            .unwrap();
        assert_eq!(label.as_str(), "Adult-Gerontology Primary Care NP");
    }
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

mod scenarios {
    use super::*;

    fn fill_blank(credentials: &str, observed: &[&str]) -> ClassificationResult {
        let engine = FillEngine::new().unwrap();
        let observed = ObservedLabelSet::from_labels(observed);
        engine
            .orchestrator(&observed)
            .fill(&RosterRecord::new(None, Some(credentials)))
    }

    #[test]
    fn family_credentials_with_family_label_observed() {
        assert_eq!(fill_blank("FNP-BC", &["Family NP"]).label(), "Family NP");
    }

    #[test]
    fn rn_credentials_fall_back_to_other() {
        let result = fill_blank("RN", &["Family NP"]);
        assert_eq!(result.bucket(), None);
        assert_eq!(result.label(), "Other");
    }

    #[test]
    fn pediatric_acute_spelled_out() {
        let mapper = CanonicalMapper::new().unwrap();
        assert_eq!(
            mapper
                .canonicalize("Pediatric Nurse Practitioner \u{2013} Acute Care")
                .unwrap()
                .as_str(),
            "Pediatrics Acute Care NP"
        );
    }

    #[test]
    fn obgyn_is_womens_health() {
        let mapper = CanonicalMapper::new().unwrap();
        assert_eq!(mapper.canonicalize("OBGYN NP").unwrap().as_str(), "Women's Health NP");
    }
}

// ============================================================================
// Two-pass fill over the roster fixture
// ============================================================================

mod fill_pass {
    use super::*;

    #[test]
    fn fills_blank_rows_from_observed_labels() {
        let (dataset, _) = filled_roster(&TaxonomyConfig::default());
        let expected = [
            ("Ann", "Family NP"),
            ("Ben", "Family NP"),
            ("Cara", "Other"),
            ("Dee", "Psych/Mental Health NP"),
            ("Eve", "Psych/Mental Health NP"),
            ("Finn", "Adult-Gerontology Primary Care NP"),
            ("Gus", "Adult-Gerontology Primary Care NP"),
            ("Hal", "Primary Care NP"),
            ("Ivy", "Pediatric Nurse Practitioner \u{2013} Acute Care"),
            ("Jo", "OBGYN NP"),
            ("Kim", "Other"),
            ("Lou", "Other"),
            ("Max", "Other"),
            ("Nia", "Family NP"),
        ];
        for (name, label) in expected {
            assert_eq!(
                value_for(&dataset, name, "NP_Type_filled").as_deref(),
                Some(label),
                "row {name}"
            );
        }
    }

    #[test]
    fn original_columns_are_untouched() {
        let before = load_roster();
        let (after, _) = filled_roster(&TaxonomyConfig::default());
        for column in before.headers() {
            assert_eq!(column_values(&before, column), column_values(&after, column), "{column}");
        }
        assert_eq!(after.headers().last().map(String::as_str), Some("NP_Type_filled"));
    }

    #[test]
    fn output_is_never_blank() {
        let (dataset, _) = filled_roster(&TaxonomyConfig::default());
        assert!(column_values(&dataset, "NP_Type_filled")
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty())));
    }

    #[test]
    fn inferred_labels_come_from_observed_set() {
        let (dataset, report) = filled_roster(&TaxonomyConfig::default());
        let originals = column_values(&dataset, "NP_Type");
        let filled = column_values(&dataset, "NP_Type_filled");
        for (original, filled) in originals.iter().zip(&filled) {
            let filled = filled.as_deref().unwrap();
            if original.is_none() && filled != "Other" {
                assert!(report.observed_labels.contains(filled), "{filled}");
            }
        }
    }

    #[test]
    fn observed_set_excludes_blank_markers() {
        let (_, report) = filled_roster(&TaxonomyConfig::default());
        assert!(!report.observed_labels.contains("nan"));
        assert_eq!(report.observed_labels.len(), 7);
        assert_eq!(report.observed_labels.sorted()[0], "Adult-Gerontology Primary Care NP");
    }

    #[test]
    fn report_counts_blank_rows_by_outcome() {
        let (_, report) = filled_roster(&TaxonomyConfig::default());
        assert_eq!(report.total_rows, 14);
        assert_eq!(report.blank_specialty_rows, 7);
        assert_eq!(report.inferred_rows, 4);
        assert_eq!(report.unmatched_rows, 3);

        let blank: Vec<(&str, usize)> = report
            .blank_counts
            .iter()
            .map(|c| (c.label.as_str(), c.count))
            .collect();
        assert_eq!(
            blank,
            vec![
                ("Other", 3),
                ("Family NP", 2),
                ("Adult-Gerontology Primary Care NP", 1),
                ("Psych/Mental Health NP", 1),
            ]
        );
        assert_eq!(report.blank_counts.iter().map(|c| c.count).sum::<usize>(), 7);
        assert!(report.vocabulary.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn report_counts_every_row_of_output_column() {
        let (_, report) = filled_roster(&TaxonomyConfig::default());
        assert_eq!(report.counts[0].label, "Other");
        assert_eq!(report.counts[0].count, 4);
        assert_eq!(report.counts[1].label, "Family NP");
        assert_eq!(report.counts[1].count, 3);
        assert_eq!(report.counts.iter().map(|c| c.count).sum::<usize>(), 14);
    }

    #[test]
    fn sequential_matches_parallel() {
        let (parallel, _) = filled_roster(&TaxonomyConfig::default());
        let (sequential, _) = filled_roster(&TaxonomyConfig {
            parallel: false,
            ..TaxonomyConfig::default()
        });
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn row_order_does_not_change_results() {
        let forward = load_roster();
        let headers = forward.headers().to_vec();
        let mut rows: Vec<Vec<Option<String>>> = (0..forward.len())
            .map(|row| {
                (0..headers.len())
                    .map(|col| forward.cell(row, col).map(str::to_string))
                    .collect()
            })
            .collect();
        rows.reverse();
        let mut reversed = Dataset::new(headers, rows).unwrap();

        let (filled_forward, _) = filled_roster(&TaxonomyConfig::default());
        TaxonomyProcessor::new()
            .unwrap()
            .fill_dataset(&mut reversed, &TaxonomyConfig::default())
            .unwrap();

        let mut expected = column_values(&filled_forward, "NP_Type_filled");
        expected.reverse();
        assert_eq!(column_values(&reversed, "NP_Type_filled"), expected);
    }

    #[test]
    fn canonicalized_output_uses_taxonomy_labels() {
        let (dataset, report) = filled_roster(&TaxonomyConfig {
            canonicalize_output: true,
            ..TaxonomyConfig::default()
        });
        assert_eq!(value_for(&dataset, "Cara", "NP_Type_filled").as_deref(), Some("Other NP"));
        assert_eq!(
            value_for(&dataset, "Ivy", "NP_Type_filled").as_deref(),
            Some("Pediatrics Acute Care NP")
        );
        assert_eq!(
            value_for(&dataset, "Jo", "NP_Type_filled").as_deref(),
            Some("Women's Health NP")
        );
        assert!(!report.vocabulary.contains(&"Other".to_string()));
    }

    #[test]
    fn custom_column_names() {
        let mut dataset = Dataset::from_bytes(
            b"Specialty\tCreds\n\tFNP\nFamily NP\t\n",
            &TaxonomyConfig::default(),
        )
        .unwrap();
        let mut config = TaxonomyConfig::default();
        config.columns.specialty = "Specialty".into();
        config.columns.credentials = "Creds".into();
        config.columns.output = "Filled".into();
        TaxonomyProcessor::new()
            .unwrap()
            .fill_dataset(&mut dataset, &config)
            .unwrap();
        assert_eq!(
            column_values(&dataset, "Filled"),
            vec![Some("Family NP".to_string()), Some("Family NP".to_string())]
        );
    }

    #[test]
    fn no_observed_labels_fills_everything_with_other() {
        let mut dataset = Dataset::from_bytes(
            b"NP_Type,Credentials\n,FNP\n,PMHNP\n,RN\n",
            &TaxonomyConfig::default(),
        )
        .unwrap();
        let report = TaxonomyProcessor::new()
            .unwrap()
            .fill_dataset(&mut dataset, &TaxonomyConfig::default())
            .unwrap();
        assert!(report.observed_labels.is_empty());
        assert_eq!(report.vocabulary, vec!["Other"]);
    }
}

// ============================================================================
// Errors
// ============================================================================

mod errors {
    use super::*;

    #[test]
    fn missing_credentials_column_fails_before_processing() {
        let mut dataset = load_roster();
        let before = dataset.clone();
        let mut config = TaxonomyConfig::default();
        config.columns.credentials = "Creds".into();

        let err = TaxonomyProcessor::new()
            .unwrap()
            .fill_dataset(&mut dataset, &config)
            .unwrap_err();
        match err {
            TaxonomyError::MissingColumn { column, found } => {
                assert_eq!(column, "Creds");
                assert!(found.contains(&"Credentials".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(dataset, before);
    }

    #[test]
    fn missing_specialty_column_message_lists_columns() {
        let mut dataset =
            Dataset::from_bytes(b"Name,Credentials\nAnn,FNP\n", &TaxonomyConfig::default())
                .unwrap();
        let err = TaxonomyProcessor::new()
            .unwrap()
            .fill_dataset(&mut dataset, &TaxonomyConfig::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Column 'NP_Type' not found. Found: ["Name", "Credentials"]"#
        );
    }
}

// ============================================================================
// Canonicalize / standardize / summarize
// ============================================================================

mod column_passes {
    use super::*;

    #[test]
    fn canonicalize_column_in_place() {
        let mut dataset = load_roster();
        let report = TaxonomyProcessor::new()
            .unwrap()
            .canonicalize_column(&mut dataset, "NP_Type")
            .unwrap();
        assert_eq!(value_for(&dataset, "Lou", "NP_Type").as_deref(), Some("Other NP"));
        assert_eq!(value_for(&dataset, "Ben", "NP_Type"), None);
        assert_eq!(report.count_of(""), 7);
        assert!(report.vocabulary.contains(&"Women's Health NP".to_string()));
    }

    #[test]
    fn standardize_fields_and_specialty() {
        let mut dataset = load_roster();
        let report = TaxonomyProcessor::new()
            .unwrap()
            .standardize_dataset(
                &mut dataset,
                &StandardizeColumns::default(),
                &TaxonomyConfig::default(),
            )
            .unwrap();

        assert!(report.zip_standardized);
        assert!(report.streets_merged);
        assert_eq!(dataset.column_index("Street2"), None);

        assert_eq!(value_for(&dataset, "Ann", "ZIP").as_deref(), Some("12345"));
        assert_eq!(value_for(&dataset, "Ben", "ZIP").as_deref(), Some("02139"));
        assert_eq!(value_for(&dataset, "Eve", "ZIP"), None);
        assert_eq!(value_for(&dataset, "Gus", "ZIP").as_deref(), Some("60614"));

        assert_eq!(value_for(&dataset, "Ann", "Street1").as_deref(), Some("12 Main St Suite 4"));
        assert_eq!(value_for(&dataset, "Cara", "Street1").as_deref(), Some("44 Oak Ave"));
        assert_eq!(value_for(&dataset, "Dee", "Street1").as_deref(), Some("Apt 2"));
        assert_eq!(value_for(&dataset, "Gus", "Street1").as_deref(), Some("3 Lake Dr Unit 7"));

        assert_eq!(
            value_for(&dataset, "Ivy", "NP_Type_original").as_deref(),
            Some("Pediatric Nurse Practitioner \u{2013} Acute Care")
        );
        assert_eq!(
            value_for(&dataset, "Ivy", STANDARDIZED_COLUMN).as_deref(),
            Some("Pediatrics Acute Care NP")
        );
        assert_eq!(value_for(&dataset, "Nia", STANDARDIZED_COLUMN), None);

        assert_eq!(report.changes.len(), 3);
        assert!(report.changes.iter().all(|c| c.count == 1));
        assert!(report
            .changes
            .iter()
            .any(|c| c.original == "OBGYN NP" && c.canonical == "Women's Health NP"));
    }

    #[test]
    fn standardize_respects_top_changes_limit() {
        let mut dataset = load_roster();
        let mut config = TaxonomyConfig::default();
        config.report.top_changes = 1;
        let report = TaxonomyProcessor::new()
            .unwrap()
            .standardize_dataset(&mut dataset, &StandardizeColumns::default(), &config)
            .unwrap();
        assert_eq!(report.changes.len(), 1);
    }

    #[test]
    fn summarize_counts_blanks() {
        let dataset = load_roster();
        let report = TaxonomyProcessor::new()
            .unwrap()
            .summarize_column(&dataset, "NP_Type")
            .unwrap();
        assert_eq!(report.total_rows, 14);
        assert_eq!(report.count_of(""), 7);
        assert_eq!(report.vocabulary.len(), 7);
        assert!(TaxonomyProcessor::new()
            .unwrap()
            .summarize_column(&dataset, "Nope")
            .is_err());
    }
}

// ============================================================================
// Filesystem round trips
// ============================================================================

mod round_trip {
    use super::*;

    #[test]
    fn filled_csv_reads_back_identically() {
        let (dataset, _) = filled_roster(&TaxonomyConfig::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/filled.csv");
        dataset.write_to_path(&path, true).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));

        let back = Dataset::from_path(&path, &TaxonomyConfig::default()).unwrap();
        assert_eq!(back.headers()[0], "Name");
        assert_eq!(
            column_values(&back, "NP_Type_filled"),
            column_values(&dataset, "NP_Type_filled")
        );
    }

    #[test]
    fn report_saves_as_json() {
        let (_, report) = filled_roster(&TaxonomyConfig::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.save_json(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["blank_specialty_rows"], 7);
        assert_eq!(json["observed_labels"].as_array().unwrap().len(), 7);
        assert_eq!(json["counts"][0]["label"], "Other");
        assert_eq!(json["blank_counts"][1]["label"], "Family NP");
        assert_eq!(json["blank_counts"][1]["count"], 2);
    }
}
